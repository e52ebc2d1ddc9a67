use pretty_assertions::assert_eq;

use ogma_core::config::{
    ConfigRegistry, ConfigRegistryBuilder, Direction, NodeConfiguration, RelationConfig,
};
use ogma_core::emit::{emit_create_single, emit_merge_single};
use ogma_core::error::OgmaError;
use ogma_core::shape::ShapeNode;
use ogma_core::statement::Statement;
use ogma_core::value::{map_of, Value};

fn movie_registry() -> ConfigRegistry {
    ConfigRegistryBuilder::new()
        .register(
            "Movie",
            NodeConfiguration::new()
                .identifier("Id")
                .relation(
                    "Actors",
                    RelationConfig::new("ACTED_IN", Direction::In)
                        .target("Person")
                        .merge_on("Id"),
                )
                .relation(
                    "Director",
                    RelationConfig::new("DIRECTED_BY", Direction::Out).target("Person"),
                ),
        )
        .unwrap()
        .register(
            "Person",
            NodeConfiguration::new().identifier("Id").relation(
                "Awards",
                RelationConfig::new("WON", Direction::Out).target("Award"),
            ),
        )
        .unwrap()
        .build()
        .unwrap()
}

fn movie_batch() -> Vec<std::collections::BTreeMap<String, Value>> {
    vec![map_of([
        ("Id", Value::Int(1)),
        ("Title", Value::from("The Matrix")),
        (
            "Actors",
            Value::List(vec![Value::Map(map_of([("Id", Value::Int(10))]))]),
        ),
        (
            "Director",
            Value::Map(map_of([
                ("Id", Value::Int(20)),
                ("Name", Value::from("Lana")),
            ])),
        ),
    ])]
}

#[test]
fn shape_unions_heterogeneous_batches() {
    let registry = movie_registry();
    let batch = vec![
        map_of([("Id", Value::Int(1))]),
        map_of([("Id", Value::Int(2)), ("Title", Value::from("Alien"))]),
        map_of([
            ("Id", Value::Int(3)),
            (
                "Actors",
                Value::List(vec![Value::Map(map_of([("Id", Value::Int(10))]))]),
            ),
        ]),
    ];

    let mut shape = ShapeNode::new("Movie");
    shape.consider(&batch, &registry).unwrap();

    assert_eq!(shape.identifiers, vec!["Id".to_string()]);
    assert_eq!(shape.properties, vec!["Title".to_string()]);
    assert!(shape.multiple_relations.contains_key("Actors"));
    assert!(shape.single_relations.is_empty());
}

#[test]
fn shape_consider_is_reinvocable_without_duplicates() {
    let registry = movie_registry();
    let batch = vec![map_of([
        ("Id", Value::Int(1)),
        ("Title", Value::from("Alien")),
    ])];

    let mut shape = ShapeNode::new("Movie");
    shape.consider(&batch, &registry).unwrap();
    shape.consider(&batch, &registry).unwrap();

    assert_eq!(shape.identifiers, vec!["Id".to_string()]);
    assert_eq!(shape.properties, vec!["Title".to_string()]);
}

#[test]
fn null_only_properties_are_not_shape_candidates() {
    let registry = movie_registry();
    let batch = vec![
        map_of([("Id", Value::Int(1)), ("Tagline", Value::Null)]),
        map_of([("Id", Value::Int(2)), ("Tagline", Value::Null)]),
    ];

    let mut shape = ShapeNode::new("Movie");
    shape.consider(&batch, &registry).unwrap();
    assert!(shape.properties.is_empty());
}

#[test]
fn enforcement_rejects_batch_without_identifiers() {
    let registry = ConfigRegistryBuilder::new()
        .enforce_identifiers(true)
        .register("Movie", NodeConfiguration::new().identifier("Id"))
        .unwrap()
        .build()
        .unwrap();

    let batch = vec![map_of([("Title", Value::from("Alien"))])];
    let mut shape = ShapeNode::new("Movie");
    let err = shape.consider(&batch, &registry).unwrap_err();
    assert!(matches!(err, OgmaError::IdentifiersMissing { .. }));
}

#[test]
fn batch_merge_statement_shape() {
    let registry = movie_registry();
    let mut shape = ShapeNode::new("Movie");
    shape.consider(&movie_batch(), &registry).unwrap();

    let cypher = shape.emit_merge("Movie_merges", 0);
    assert_eq!(
        cypher,
        "UNWIND $Movie_merges AS muv0\n\
         MERGE (m0:Movie {Id: muv0.Id}) SET m0.Title = muv0.Title\n\
         FOREACH (muv0_1_0 IN CASE WHEN muv0.Director IS NOT NULL THEN [1] ELSE [] END | \
         MERGE (m0_1_0:Person {Id: muv0.Director.Id}) SET m0_1_0.Name = muv0.Director.Name \
         MERGE (m0)-[:DIRECTED_BY]->(m0_1_0))\n\
         FOREACH (muv0_1_1 IN muv0.Actors | \
         MERGE (m0_1_1:Person {Id: muv0_1_1.Id}) \
         MERGE (m0)<-[:ACTED_IN]-(m0_1_1))"
    );
}

#[test]
fn batch_create_statement_shape() {
    let registry = movie_registry();
    let mut shape = ShapeNode::new("Movie");
    shape.consider(&movie_batch(), &registry).unwrap();

    let cypher = shape.emit_create("Movie_creates", 0);
    assert_eq!(
        cypher,
        "UNWIND $Movie_creates AS cuv0\n\
         CREATE (c0:Movie) SET c0.Id = cuv0.Id, c0.Title = cuv0.Title\n\
         FOREACH (muv0_1_0 IN CASE WHEN cuv0.Director IS NOT NULL THEN [1] ELSE [] END | \
         MERGE (m0_1_0:Person {Id: cuv0.Director.Id}) SET m0_1_0.Name = cuv0.Director.Name \
         MERGE (c0)-[:DIRECTED_BY]->(m0_1_0))\n\
         FOREACH (muv0_1_1 IN cuv0.Actors | \
         MERGE (m0_1_1:Person {Id: muv0_1_1.Id}) \
         MERGE (c0)<-[:ACTED_IN]-(m0_1_1))"
    );
}

#[test]
fn merge_restricted_relation_sets_nothing_on_far_node() {
    // The concrete scenario: Actors restricted to the Id merge key must
    // produce a far-node MERGE per actor and no SET for actor names, while
    // the root keeps its full SET clause.
    let registry = movie_registry();
    let mut shape = ShapeNode::new("Movie");
    shape.consider(&movie_batch(), &registry).unwrap();

    let cypher = shape.emit_merge("Movie_merges", 0);
    assert!(cypher.contains("MERGE (m0_1_1:Person {Id: muv0_1_1.Id})"));
    assert!(!cypher.contains("m0_1_1.Name"));
    assert!(cypher.contains("SET m0.Title = muv0.Title"));
}

#[test]
fn nested_relations_render_nested_foreach() {
    let registry = movie_registry();
    // Built directly (not through the flattener) the way anonymous
    // dictionary batches arrive: actors carrying their own awards.
    let batch = vec![map_of([
        ("Id", Value::Int(1)),
        (
            "Actors",
            Value::List(vec![Value::Map(map_of([
                ("Id", Value::Int(10)),
                (
                    "Awards",
                    Value::List(vec![Value::Map(map_of([("Name", Value::from("Oscar"))]))]),
                ),
            ]))]),
        ),
    ])];

    let mut shape = ShapeNode::new("Movie");
    shape.consider(&batch, &registry).unwrap();

    let cypher = shape.emit_create("Movie_creates", 0);
    assert_eq!(
        cypher,
        "UNWIND $Movie_creates AS cuv0\n\
         CREATE (c0:Movie) SET c0.Id = cuv0.Id\n\
         FOREACH (muv0_1_0 IN cuv0.Actors | \
         MERGE (m0_1_0:Person {Id: muv0_1_0.Id}) \
         MERGE (c0)<-[:ACTED_IN]-(m0_1_0) \
         FOREACH (muv0_2_0 IN muv0_1_0.Awards | \
         MERGE (m0_2_0:Award {Name: muv0_2_0.Name}) \
         MERGE (m0_1_0)-[:WON]->(m0_2_0)))"
    );
}

#[test]
fn set_index_flows_into_aliases() {
    let registry = movie_registry();
    let batch = vec![map_of([("Id", Value::Int(1))])];
    let mut shape = ShapeNode::new("Person");
    shape.consider(&batch, &registry).unwrap();

    let cypher = shape.emit_merge("Person_merges", 3);
    assert_eq!(
        cypher,
        "UNWIND $Person_merges AS muv3\nMERGE (m3:Person {Id: muv3.Id})"
    );
}

#[test]
fn odd_labels_are_backticked() {
    let registry = ConfigRegistryBuilder::new().build().unwrap();
    let batch = vec![map_of([("Id", Value::Int(1))])];
    let mut shape = ShapeNode::new("Legacy-Node");
    shape.consider(&batch, &registry).unwrap();

    let cypher = shape.emit_create("Legacy_Node_creates", 0);
    assert_eq!(
        cypher,
        "UNWIND $Legacy_Node_creates AS cuv0\nCREATE (c0:`Legacy-Node`) SET c0.Id = cuv0.Id"
    );
}

// --- single-item statements ---

#[test]
fn create_single_externalizes_every_property() {
    let map = map_of([("Id", Value::Int(1)), ("Title", Value::from("Alien"))]);
    let statement = emit_create_single(&map, "Movie", 0, 0);

    assert_eq!(
        statement.text,
        "CREATE (c0:Movie) SET c0.Id = $cp_0_0_0, c0.Title = $cp_0_0_1"
    );
    assert_eq!(statement.parameters.get("cp_0_0_0"), Some(&Value::Int(1)));
    assert_eq!(
        statement.parameters.get("cp_0_0_1"),
        Some(&Value::String("Alien".into()))
    );
}

#[test]
fn merge_single_splits_pattern_and_set() {
    let mut identifiers = std::collections::BTreeSet::new();
    identifiers.insert("Id".to_string());
    let map = map_of([("Id", Value::Int(1)), ("Title", Value::from("Alien"))]);

    let statement = emit_merge_single(&map, "Movie", &identifiers, 2, 5);
    assert_eq!(
        statement.text,
        "MERGE (m2:Movie {Id: $cp_2_5_0}) SET m2.Title = $cp_2_5_1"
    );
}

#[test]
fn merge_single_without_identifier_merges_on_everything() {
    let identifiers = std::collections::BTreeSet::new();
    let map = map_of([("Name", Value::from("Oscar"))]);

    let statement = emit_merge_single(&map, "Award", &identifiers, 0, 0);
    assert_eq!(statement.text, "MERGE (m0:Award {Name: $cp_0_0_0})");
}

// --- statement joining ---

#[test]
fn fragments_join_with_inert_with() {
    let a = Statement::new("CREATE (c0:Movie)").with_param("x", 1_i64);
    let b = Statement::new("CREATE (c1:Person)").with_param("y", 2_i64);

    let joined = Statement::join(vec![a, b]).unwrap();
    assert_eq!(
        joined.text,
        "CREATE (c0:Movie)\nWITH 0 AS nothing\nCREATE (c1:Person)"
    );
    assert_eq!(joined.parameters.len(), 2);
}

#[test]
fn joining_nothing_yields_nothing() {
    assert_eq!(Statement::join(vec![]), None);
}
