//! End-to-end transcoding and lookup over realistic bundles.

use cluster_bundle::codec::{BUNDLE, COMPONENT, NODE_CONFIG, STRUCT};
use cluster_bundle::{
    Bundle, BundleBuilder, BundleFinder, ComponentObject, ContainerImages, Encoding, FinderOptions,
    FormatError, NodeConfig, ObjectKey, Struct, ValidationError, Value, collect_component_images,
};
use proptest::prelude::*;

fn minimal_bundle() -> Bundle {
    BundleBuilder::new()
        .node_config("n1", |n| n)
        .component("c1", |c| c.object("o1"))
        .build()
}

fn etcd_pod() -> Struct {
    let container = Struct::new()
        .with("name", "etcd")
        .with("image", "gcr.io/google_containers/etcd:3.1.11")
        .with("command", vec![Value::from("etcd"), Value::from("--listen-peer-urls=http://127.0.0.1:2380")]);
    Struct::new()
        .with("apiVersion", "v1")
        .with("kind", "Pod")
        .with(
            "metadata",
            Struct::new()
                .with("name", "etcd-server")
                .with("labels", Struct::new().with("app.kubernetes.io/name", "etcd")),
        )
        .with(
            "spec",
            Struct::new()
                .with("hostNetwork", true)
                .with("containers", vec![Value::from(container)]),
        )
}

fn full_bundle() -> Bundle {
    BundleBuilder::new()
        .header("bundle.gke.io/v1alpha1", "ClusterBundle")
        .name("1.9.7.testbundle")
        .version("1.0.0")
        .node_config("masternode", |n| {
            n.os_image("cos-stable-65-10323-64-0")
                .init_file("file://path/to/init.sh")
                .external_init_cmd("/bin/bash /init.sh")
                .env("NODE_ROLE", "master")
        })
        .node_config("nodes", |n| n.os_image("cos-stable-65-10323-64-0"))
        .component("etcd-component", |c| c.version("30.0.2").inlined("etcd-server", etcd_pod()))
        .component("kube-apiserver", |c| c.file("kube-apiserver", "file://kube-apiserver.yaml"))
        .build()
}

#[test]
fn test_minimal_scenario() {
    let bundle = minimal_bundle();

    let yaml = BUNDLE.to_yaml(&bundle).unwrap();
    assert_eq!(BUNDLE.from_yaml(&yaml).unwrap(), bundle);

    let finder = BundleFinder::new(&bundle).unwrap();
    assert_eq!(finder.node_config("n1"), Some(&NodeConfig::new("n1")));
    assert_eq!(finder.component_object("c1", "o1"), Some(&ComponentObject::new("o1")));
    assert!(finder.component_images().unwrap().is_empty());
}

#[test]
fn test_minimal_scenario_yaml_shape() {
    let yaml = String::from_utf8(BUNDLE.to_yaml(&minimal_bundle()).unwrap()).unwrap();
    let json: serde_json::Value = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "nodeConfigs": [{"name": "n1"}],
            "components": [{"name": "c1", "objects": [{"name": "o1"}]}],
        })
    );
}

#[test]
fn test_full_bundle_roundtrips_in_every_encoding() {
    let bundle = full_bundle();

    let json = BUNDLE.to_json(&bundle).unwrap();
    assert_eq!(BUNDLE.from_json(&json).unwrap(), bundle);

    let yaml = BUNDLE.to_yaml(&bundle).unwrap();
    assert_eq!(BUNDLE.from_yaml(&yaml).unwrap(), bundle);

    let text = BUNDLE.to_text(&bundle).unwrap();
    assert_eq!(BUNDLE.from_text(&text).unwrap(), bundle);
}

#[test]
fn test_encodings_agree() {
    let bundle = full_bundle();
    let from_text = BUNDLE.from_text(&BUNDLE.to_text(&bundle).unwrap()).unwrap();
    let from_yaml = BUNDLE.from_yaml(&BUNDLE.to_yaml(&bundle).unwrap()).unwrap();
    assert_eq!(BUNDLE.to_json(&from_text).unwrap(), BUNDLE.to_json(&from_yaml).unwrap());
}

#[test]
fn test_hand_written_yaml() {
    let yaml = br#"
apiVersion: bundle.gke.io/v1alpha1
kind: ClusterBundle
nodeConfigs:
- name: masternode
  osImage: cos-stable
  envVars:
    NODE_ROLE: master
components:
- name: etcd-component
  objects:
  - name: etcd-server
    inlined:
      apiVersion: v1
      kind: Pod
      spec:
        containers:
        - name: etcd
          image: gcr.io/google_containers/etcd:3.1.11
"#;
    let bundle = BUNDLE.from_yaml(yaml).unwrap();
    let finder = BundleFinder::new(&bundle).unwrap();

    assert_eq!(finder.node_config("masternode").unwrap().env_vars["NODE_ROLE"], "master");
    let object = finder.component_object("etcd-component", "etcd-server").unwrap();
    let kind = object.inlined.as_ref().and_then(|s| s.get("kind"));
    assert_eq!(kind, Some(&Value::from("Pod")));

    let images = finder.component_images_with(&ContainerImages).unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].key, ObjectKey::new("etcd-component", "etcd-server"));
    assert_eq!(images[0].image, "gcr.io/google_containers/etcd:3.1.11");
}

#[test]
fn test_hand_written_text_form() {
    let text = br#"
# Text form of a single component.
name: "etcd-component"
version: "30.0.2"
objects {
  name: "etcd-server"
  inlined {
    kind: "Pod"
    spec { hostNetwork: true }
  }
}
objects { name: "etcd-service" file { url: "file://svc.yaml" } }
"#;
    let component = COMPONENT.from_text(text).unwrap();
    assert_eq!(component.objects.len(), 2);
    assert_eq!(component.objects[1].file.as_ref().unwrap().url, "file://svc.yaml");
}

#[test]
fn test_strict_json_rejection_and_acceptance() {
    let rejected = br#"{"name":"n1","osImage":"cos","extraField":true}"#;
    assert!(matches!(
        NODE_CONFIG.from_json(rejected),
        Err(FormatError::Decode { encoding: Encoding::Json, .. })
    ));

    let accepted = br#"{"name":"n1","osImage":"cos"}"#;
    assert_eq!(NODE_CONFIG.from_json(accepted).unwrap().os_image, "cos");
}

#[test]
fn test_unknown_field_in_yaml_and_text() {
    assert!(matches!(
        BUNDLE.from_yaml(b"nodeConfig:\n- name: n1\n"),
        Err(FormatError::Decode { encoding: Encoding::Yaml, .. })
    ));
    assert!(matches!(
        BUNDLE.from_text(b"nodeConfig: [{ name: \"n1\" }]"),
        Err(FormatError::Decode { encoding: Encoding::Text, .. })
    ));
}

#[test]
fn test_malformed_input_per_encoding() {
    assert!(matches!(BUNDLE.from_json(b"{\"components\": ["), Err(FormatError::Syntax { .. })));
    assert!(matches!(BUNDLE.from_yaml(b"components: [a"), Err(FormatError::Syntax { .. })));
    assert!(matches!(BUNDLE.from_text(b"components: [a"), Err(FormatError::TextSyntax { .. })));
}

#[test]
fn test_duplicate_component_overwrite_last_wins() {
    let bundle = BundleBuilder::new()
        .component("A", |c| c.version("first"))
        .component("A", |c| c.version("second"))
        .build();

    let finder = BundleFinder::new(&bundle).unwrap();
    assert_eq!(finder.component("A").unwrap().version, "second");

    let strict = BundleFinder::with_options(&bundle, FinderOptions::strict());
    assert_eq!(
        strict.unwrap_err(),
        ValidationError::DuplicateComponentName { name: "A".to_string() }
    );
}

#[test]
fn test_empty_node_name_fails_build() {
    let bundle = BundleBuilder::new().push_node_config(NodeConfig::new("")).build();
    assert!(matches!(
        BundleFinder::new(&bundle),
        Err(ValidationError::EmptyNodeName { index: 0 })
    ));
}

#[test]
fn test_empty_object_name_fails_image_collection() {
    let bundle = BundleBuilder::new()
        .component("web", |c| c.object(""))
        .build();

    let expected = ValidationError::EmptyObjectName {
        component: "web".to_string(),
        index: 0,
    };
    assert_eq!(collect_component_images(&bundle, &ContainerImages), Err(expected.clone()));
    assert_eq!(BundleFinder::new(&bundle).unwrap_err(), expected);
}

#[test]
fn test_lookup_absent() {
    let bundle = BundleBuilder::new()
        .component("web", |c| c.object("deployment"))
        .build();
    let finder = BundleFinder::new(&bundle).unwrap();

    assert!(finder.component_object("web", "deployment").is_some());
    assert!(finder.component_object("web", "missing").is_none());
    assert!(finder.component_object("absent", "deployment").is_none());
}

#[test]
fn test_finder_isolated_from_caller() {
    let mut bundle = full_bundle();
    let finder = BundleFinder::new(&bundle).unwrap();

    bundle.components[0].name = "renamed".to_string();
    bundle.components[0].objects.clear();

    assert!(finder.component("etcd-component").is_some());
    assert!(finder.component("renamed").is_none());
    assert!(finder.component_object("etcd-component", "etcd-server").is_some());
}

#[test]
fn test_finder_shared_across_threads() {
    let finder = BundleFinder::new(&full_bundle()).unwrap();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert!(finder.node_config("masternode").is_some());
                assert!(finder.component("kube-apiserver").is_some());
            });
        }
    });
}

#[test]
fn test_non_finite_payload_numbers_fail_every_encoding() {
    for n in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let payload = Struct::new().with("x", Value::Number(n)).with("y", 1i64);
        assert!(matches!(STRUCT.to_json(&payload), Err(FormatError::Encode { .. })));
        assert!(matches!(STRUCT.to_yaml(&payload), Err(FormatError::Encode { .. })));
        assert!(matches!(STRUCT.to_text(&payload), Err(FormatError::Encode { .. })));

        let bundle = BundleBuilder::new()
            .component("c1", |c| c.inlined("o1", payload.clone()))
            .build();
        assert!(BUNDLE.to_json(&bundle).is_err());
    }
}

#[test]
fn test_null_and_empty_values_read_as_defaults() {
    let bundle = BUNDLE.from_yaml(b"components:\n- name: c1\n  objects:\n").unwrap();
    assert_eq!(bundle.components.len(), 1);
    assert!(bundle.components[0].objects.is_empty());

    assert_eq!(BUNDLE.from_yaml(b"").unwrap(), Bundle::default());
    assert_eq!(BUNDLE.from_json(br#"{"name":null}"#).unwrap(), Bundle::default());
    assert_eq!(BUNDLE.from_json(b"null").unwrap(), Bundle::default());
    assert_eq!(
        NODE_CONFIG.from_yaml(b"name: n1\nosImage:\nenvVars:\n").unwrap(),
        NodeConfig::new("n1")
    );
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_./-]{0,8}"
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1_000_000i64..1_000_000).prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::Number),
        "[a-z][a-z0-9 ._/-]{0,10}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            prop::collection::btree_map(arb_key(), inner, 0..4)
                .prop_map(|m| Value::Struct(m.into_iter().collect())),
        ]
    })
}

fn arb_struct() -> impl Strategy<Value = Struct> {
    prop::collection::btree_map(arb_key(), arb_value(), 0..5).prop_map(|m| m.into_iter().collect())
}

fn arb_bundle() -> impl Strategy<Value = Bundle> {
    let object = ("[a-z]{1,6}", prop::option::of(arb_struct())).prop_map(|(name, inlined)| ComponentObject {
        name,
        inlined,
        file: None,
    });
    let component = ("[a-z]{1,6}", prop::collection::vec(object, 0..3))
        .prop_map(|(name, objects)| cluster_bundle::Component { name, objects, ..Default::default() });
    let node = "[a-z]{1,6}".prop_map(NodeConfig::new);
    (prop::collection::vec(node, 0..3), prop::collection::vec(component, 0..3)).prop_map(
        |(node_configs, components)| Bundle {
            node_configs,
            components,
            ..Default::default()
        },
    )
}

proptest! {
    #[test]
    fn prop_struct_roundtrips(s in arb_struct()) {
        prop_assert_eq!(STRUCT.from_json(&STRUCT.to_json(&s).unwrap()).unwrap(), s.clone());
        prop_assert_eq!(STRUCT.from_text(&STRUCT.to_text(&s).unwrap()).unwrap(), s.clone());
        prop_assert_eq!(STRUCT.from_yaml(&STRUCT.to_yaml(&s).unwrap()).unwrap(), s);
    }

    #[test]
    fn prop_bundle_roundtrips(bundle in arb_bundle()) {
        prop_assert_eq!(BUNDLE.from_json(&BUNDLE.to_json(&bundle).unwrap()).unwrap(), bundle.clone());
        prop_assert_eq!(BUNDLE.from_text(&BUNDLE.to_text(&bundle).unwrap()).unwrap(), bundle.clone());
        prop_assert_eq!(BUNDLE.from_yaml(&BUNDLE.to_yaml(&bundle).unwrap()).unwrap(), bundle);
    }
}
