use std::sync::Arc;

use pretty_assertions::assert_eq;

use ogma::prelude::*;
use ogma_core::value::map_of;

fn movie_registry() -> Arc<ConfigRegistry> {
    Arc::new(
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
            .register("Person", NodeConfiguration::new().identifier("Id"))
            .unwrap()
            .build()
            .unwrap(),
    )
}

#[derive(IntoGraphValue)]
#[ogma(label = "Person")]
#[allow(dead_code)]
struct Person {
    #[ogma(prop = "Id")]
    id: i64,
    #[ogma(prop = "Name")]
    name: String,
}

#[test]
fn save_cycle_renders_one_statement_per_pending_batch() {
    let mut ctx = GraphContext::detached(movie_registry());

    ctx.node_set("Movie")
        .merge(Value::Map(map_of([
            ("Id", Value::Int(1)),
            ("Title", Value::from("Alien")),
        ])))
        .unwrap();
    ctx.node_set_of::<Person>()
        .add(Person { id: 10, name: "Sigourney".into() })
        .unwrap();

    let statement = ctx.build_statement().unwrap().expect("pending work");
    assert_eq!(
        statement.text,
        "UNWIND $Movie_merges AS muv0\n\
         MERGE (m0:Movie {Id: muv0.Id}) SET m0.Title = muv0.Title\n\
         WITH 0 AS nothing\n\
         UNWIND $Person_creates AS cuv1\n\
         CREATE (c1:Person) SET c1.Id = cuv1.Id, c1.Name = cuv1.Name"
    );

    let movies = statement.parameters.get("Movie_merges").unwrap();
    assert_eq!(movies.as_list().unwrap().len(), 1);
    let people = statement.parameters.get("Person_creates").unwrap();
    assert_eq!(people.as_list().unwrap().len(), 1);
}

#[test]
fn sequential_add_ranges_append_to_one_batch() {
    let mut ctx = GraphContext::detached(movie_registry());

    ctx.node_set("Movie")
        .add_range(vec![
            Value::Map(map_of([("Id", Value::Int(1))])),
            Value::Map(map_of([("Id", Value::Int(2))])),
        ])
        .unwrap();
    ctx.node_set("Movie")
        .add_range(vec![Value::Map(map_of([("Id", Value::Int(3))]))])
        .unwrap();

    let statement = ctx.build_statement().unwrap().unwrap();
    let batch = statement.parameters.get("Movie_creates").unwrap();
    assert_eq!(batch.as_list().unwrap().len(), 3);
}

#[test]
fn build_statement_does_not_clear_pending_buffers() {
    let mut ctx = GraphContext::detached(movie_registry());
    ctx.node_set("Movie")
        .add(Value::Map(map_of([("Id", Value::Int(1))])))
        .unwrap();

    let first = ctx.build_statement().unwrap().unwrap();
    let second = ctx.build_statement().unwrap().unwrap();
    assert_eq!(first, second);
    assert!(ctx.node_set("Movie").has_pending());
}

#[test]
fn relation_save_restricts_actor_properties_to_merge_keys() {
    let mut ctx = GraphContext::detached(movie_registry());

    ctx.node_set("Movie")
        .merge(Value::Map(map_of([
            ("Id", Value::Int(1)),
            ("Title", Value::from("The Matrix")),
            (
                "Actors",
                Value::List(vec![Value::Map(map_of([
                    ("Id", Value::Int(10)),
                    ("Name", Value::from("Keanu")),
                ]))]),
            ),
            (
                "Director",
                Value::Map(map_of([
                    ("Id", Value::Int(20)),
                    ("Name", Value::from("Lana")),
                ])),
            ),
        ])))
        .unwrap();

    let statement = ctx.build_statement().unwrap().unwrap();
    // Far actors merge on Id only and get no SET; the director relation has
    // no merge restriction so its name survives; the root keeps a full SET.
    assert!(statement.text.contains("MERGE (m0_1_1:Person {Id: muv0_1_1.Id})"));
    assert!(!statement.text.contains("m0_1_1.Name"));
    assert!(statement.text.contains("SET m0_1_0.Name = muv0.Director.Name"));
    assert!(statement.text.contains("SET m0.Title = muv0.Title"));

    // The batch parameter itself carries no actor name either.
    let batch = statement.parameters.get("Movie_merges").unwrap();
    let movie = batch.as_list().unwrap()[0].as_map().unwrap();
    let actors = movie.get("Actors").and_then(Value::as_list).unwrap();
    assert_eq!(actors[0].as_map().unwrap().get("Name"), None);
}

#[test]
fn identifier_enforcement_fails_at_add_time() {
    let registry = Arc::new(
        ConfigRegistryBuilder::new()
            .enforce_identifiers(true)
            .register("Movie", NodeConfiguration::new().identifier("Id"))
            .unwrap()
            .build()
            .unwrap(),
    );
    let mut ctx = GraphContext::detached(registry);

    let err = ctx
        .node_set("Movie")
        .add(Value::Map(map_of([("Title", Value::from("Alien"))])))
        .unwrap_err();
    assert!(matches!(err, OgmaError::IdentifiersMissing { .. }));

    let err = ctx
        .node_set("Movie")
        .add(Value::Map(map_of([("Id", Value::Null)])))
        .unwrap_err();
    assert!(matches!(err, OgmaError::IdentifierNull { .. }));

    // Failed adds leave nothing pending.
    assert!(ctx.build_statement().unwrap().is_none());
}

#[test]
fn single_item_operations_use_creation_parameters() {
    let mut ctx = GraphContext::detached(movie_registry());

    ctx.node_set("Movie")
        .create_single(Value::Map(map_of([
            ("Id", Value::Int(1)),
            ("Title", Value::from("Alien")),
        ])))
        .unwrap();
    ctx.node_set("Movie")
        .merge_single(Value::Map(map_of([
            ("Id", Value::Int(2)),
            ("Title", Value::from("Aliens")),
        ])))
        .unwrap();

    let statement = ctx.build_statement().unwrap().unwrap();
    assert_eq!(
        statement.text,
        "CREATE (c0:Movie) SET c0.Id = $cp_0_0_0, c0.Title = $cp_0_0_1\n\
         WITH 0 AS nothing\n\
         MERGE (m0:Movie {Id: $cp_0_1_0}) SET m0.Title = $cp_0_1_1"
    );
    assert_eq!(statement.parameters.get("cp_0_0_0"), Some(&Value::Int(1)));
    assert_eq!(statement.parameters.get("cp_0_1_0"), Some(&Value::Int(2)));
}

#[test]
fn single_item_operations_reject_relations() {
    let mut ctx = GraphContext::detached(movie_registry());

    let err = ctx
        .node_set("Movie")
        .create_single(Value::Map(map_of([
            ("Id", Value::Int(1)),
            (
                "Actors",
                Value::List(vec![Value::Map(map_of([("Id", Value::Int(10))]))]),
            ),
        ])))
        .unwrap_err();
    assert!(matches!(err, OgmaError::Mapping(_)));
    assert!(err.to_string().contains("Actors"));
}

#[test]
fn empty_context_builds_nothing() {
    let ctx = GraphContext::detached(movie_registry());
    assert!(ctx.build_statement().unwrap().is_none());
}

#[test]
fn detached_context_cannot_execute() {
    let mut ctx = GraphContext::detached(movie_registry());
    let err = ctx.database().unwrap_err();
    assert!(matches!(err, OgmaError::Config(_)));
}
