//! Behavioural properties of descriptor generation
//!
//! Each test feeds a diagram document through the public API and checks the
//! resulting descriptors the way a code generator would consume them.

use classforge::build;
use classforge::core::{Cardinality, DiagnosticCode};
use classforge::descriptor::{ClassDescriptor, FieldDescriptor};
use classforge::plugins::GenerationOutput;
use serde_json::{json, Value};

fn class(id: &str, label: &str, attributes: Value) -> Value {
    json!({ "id": id, "kind": "CLASS", "label": label, "attributes": attributes })
}

fn edge(id: &str, source: &str, target: &str, kind: &str, source_mult: &str, target_mult: &str) -> Value {
    json!({
        "id": id,
        "sourceNodeId": source,
        "targetNodeId": target,
        "relationshipType": kind,
        "sourceMultiplicity": source_mult,
        "targetMultiplicity": target_mult
    })
}

fn generate(nodes: Vec<Value>, edges: Vec<Value>) -> GenerationOutput {
    let document = json!({ "nodes": nodes, "edges": edges });
    build(&document.to_string()).expect("diagram should build")
}

fn descriptor<'a>(output: &'a GenerationOutput, name: &str) -> &'a ClassDescriptor {
    output
        .descriptor(name)
        .unwrap_or_else(|| panic!("missing descriptor {}", name))
}

fn count_named(descriptor: &ClassDescriptor, name: &str) -> usize {
    descriptor.fields.iter().filter(|f| f.name == name).count()
}

fn is_collection(field: &FieldDescriptor) -> bool {
    field.type_name.starts_with("List<") || field.type_name.starts_with("Set<")
}

// =============================================================================
// Foreign key direction
// =============================================================================

#[test]
fn test_one_to_many_puts_foreign_key_on_many_side() {
    let output = generate(
        vec![class("c", "Customer", json!([])), class("o", "Order", json!([]))],
        vec![edge("e1", "c", "o", "ASSOCIATION", "1", "*")],
    );

    let order = descriptor(&output, "Order");
    let customer_ref = order.field("customer").unwrap();
    assert_eq!(customer_ref.type_name, "Customer");
    let relation = customer_ref.relation.as_ref().unwrap();
    assert!(relation.owning_side);
    assert_eq!(relation.cardinality, Cardinality::ManyToOne);
    assert_eq!(
        customer_ref.annotation("JoinColumn").unwrap().argument("name"),
        Some("\"customer_id\"")
    );

    let customer = descriptor(&output, "Customer");
    let orders = customer.field("orders").unwrap();
    assert_eq!(orders.type_name, "List<Order>");
    assert!(!orders.has_annotation("JoinColumn"));
    let relation = orders.relation.as_ref().unwrap();
    assert!(!relation.owning_side);
    assert_eq!(relation.mapped_by.as_deref(), Some("customer"));
    assert!(customer
        .fields
        .iter()
        .all(|f| !f.has_annotation("JoinColumn")));

    assert!(descriptor(&output, "OrderDTO").has_field("customerId"));
    assert!(!descriptor(&output, "CustomerDTO").has_field("orderId"));
}

#[test]
fn test_many_to_one_edge_direction_is_equivalent() {
    let output = generate(
        vec![class("c", "Customer", json!([])), class("o", "Order", json!([]))],
        vec![edge("e1", "o", "c", "ASSOCIATION", "*", "1")],
    );
    assert!(descriptor(&output, "OrderDTO").has_field("customerId"));
    assert!(descriptor(&output, "Customer").has_field("orders"));
}

// =============================================================================
// Ownership determinism
// =============================================================================

fn user_profile(edges: Vec<Value>) -> GenerationOutput {
    generate(
        vec![class("u", "User", json!([])), class("p", "Profile", json!([]))],
        edges,
    )
}

#[test]
fn test_first_edge_owns_bidirectional_one_to_one() {
    let forward = edge("e1", "u", "p", "ASSOCIATION", "1", "1");
    let backward = edge("e2", "p", "u", "ASSOCIATION", "1", "1");

    let output = user_profile(vec![forward.clone(), backward.clone()]);
    let user = descriptor(&output, "User");
    let profile = descriptor(&output, "Profile");
    assert!(user.field("profile").unwrap().has_annotation("JoinColumn"));
    assert_eq!(
        profile.field("user").unwrap().annotation("OneToOne").unwrap().argument("mappedBy"),
        Some("\"profile\"")
    );
    assert!(descriptor(&output, "UserDTO").has_field("profileId"));
    assert!(!descriptor(&output, "ProfileDTO").has_field("userId"));
    assert!(output.diagnostics.has_code(DiagnosticCode::MirrorEdgeMerged));

    let output = user_profile(vec![backward, forward]);
    let user = descriptor(&output, "User");
    let profile = descriptor(&output, "Profile");
    assert!(profile.field("user").unwrap().has_annotation("JoinColumn"));
    assert!(!user.field("profile").unwrap().has_annotation("JoinColumn"));
    assert!(descriptor(&output, "ProfileDTO").has_field("userId"));
    assert!(!descriptor(&output, "UserDTO").has_field("profileId"));
}

#[test]
fn test_repeated_runs_are_identical() {
    let nodes = vec![
        class("c", "Customer", json!([{ "name": "name", "type": "String" }])),
        class("o", "Order", json!([{ "name": "total", "type": "Double" }])),
        class("t", "Tag", json!([])),
    ];
    let edges = vec![
        edge("e1", "c", "o", "ASSOCIATION", "1", "*"),
        edge("e2", "o", "t", "ASSOCIATION", "*", "*"),
    ];
    let first = generate(nodes.clone(), edges.clone());
    let second = generate(nodes, edges);
    assert_eq!(first.descriptors, second.descriptors);
    assert_eq!(first.client_models, second.client_models);
    assert_eq!(first.diagnostics, second.diagnostics);
}

// =============================================================================
// Field uniqueness
// =============================================================================

#[test]
fn test_relationship_field_wins_over_attribute() {
    let output = generate(
        vec![
            class("c", "Customer", json!([])),
            class(
                "o",
                "Order",
                json!([
                    { "name": "customer", "type": "String" },
                    { "name": "customer_id", "type": "Long" },
                    { "name": "total", "type": "Double" }
                ]),
            ),
        ],
        vec![edge("e1", "c", "o", "ASSOCIATION", "1", "*")],
    );

    let order = descriptor(&output, "Order");
    assert_eq!(count_named(order, "customer"), 1);
    assert!(order.field("customer").unwrap().is_relation());
    assert!(!order.has_field("customerId"));
    assert!(order.has_field("total"));

    let dto = descriptor(&output, "OrderDTO");
    assert_eq!(count_named(dto, "customerId"), 1);
    assert!(dto.field("customerId").unwrap().relation.is_some());
    assert!(!dto.has_field("customer"));

    assert_eq!(
        output
            .diagnostics
            .with_code(DiagnosticCode::AttributeShadowedByRelation)
            .count(),
        2
    );
}

#[test]
fn test_every_descriptor_has_unique_field_names() {
    let output = generate(
        vec![
            class("a", "Author", json!([{ "name": "name", "type": "String" }, { "name": "Name", "type": "String" }])),
            class("b", "Book", json!([{ "name": "author", "type": "String" }])),
        ],
        vec![
            edge("e1", "a", "b", "ASSOCIATION", "1", "*"),
            edge("e2", "a", "b", "AGGREGATION", "1", "*"),
        ],
    );

    for descriptor in &output.descriptors {
        let mut names = descriptor.field_names();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total, "duplicate field in {}", descriptor.name);
    }
    assert!(output.diagnostics.has_code(DiagnosticCode::RelationFieldRenamed));
}

#[test]
fn test_attribute_names_collide_by_emitted_field_name() {
    let output = generate(
        vec![
            class("c", "Customer", json!([])),
            class(
                "o",
                "Order",
                json!([
                    { "name": "created at", "type": "DateTime" },
                    { "name": "customer id", "type": "Long" },
                    { "name": "first name", "type": "String" },
                    { "name": "firstName", "type": "String" }
                ]),
            ),
        ],
        vec![edge("e1", "c", "o", "ASSOCIATION", "1", "*")],
    );

    assert_eq!(
        descriptor(&output, "Order").field_names(),
        vec!["id", "firstName", "customer", "createdAt", "updatedAt"]
    );
    assert_eq!(
        descriptor(&output, "OrderDTO").field_names(),
        vec!["id", "firstName", "customerId"]
    );
    for code in [
        DiagnosticCode::ReservedAttributeDropped,
        DiagnosticCode::AttributeShadowedByRelation,
        DiagnosticCode::DuplicateAttributeDropped,
    ] {
        assert_eq!(output.diagnostics.with_code(code).count(), 1, "{}", code);
    }
}

#[test]
fn test_reserved_attributes_never_become_fields() {
    let output = generate(
        vec![class(
            "p",
            "Product",
            json!([
                { "name": "ID", "type": "Integer" },
                { "name": "CreatedAt", "type": "Date" },
                { "name": "updated_at", "type": "DateTime" },
                { "name": "price", "type": "BigDecimal" }
            ]),
        )],
        vec![],
    );

    let entity = descriptor(&output, "Product");
    assert_eq!(entity.field_names(), vec!["id", "price", "createdAt", "updatedAt"]);
    assert_eq!(entity.field("id").unwrap().type_name, "Long");
    assert!(entity.field("id").unwrap().has_annotation("Id"));
    assert!(entity.field("createdAt").unwrap().has_annotation("CreationTimestamp"));

    let dto = descriptor(&output, "ProductDTO");
    assert_eq!(dto.field_names(), vec!["id", "price"]);
    assert_eq!(
        output
            .diagnostics
            .with_code(DiagnosticCode::ReservedAttributeDropped)
            .count(),
        3
    );
}

// =============================================================================
// Inheritance
// =============================================================================

#[test]
fn test_inheritance_root_is_abstract_with_discriminator() {
    let output = generate(
        vec![
            class("d", "Dog", json!([{ "name": "breed", "type": "String" }])),
            class("a", "Animal", json!([{ "name": "name", "type": "String" }])),
        ],
        vec![edge("e1", "d", "a", "INHERITANCE", "", "")],
    );

    let animal = descriptor(&output, "Animal");
    assert!(animal.is_abstract);
    assert_eq!(
        animal.annotation("Inheritance").unwrap().argument("strategy"),
        Some("InheritanceType.SINGLE_TABLE")
    );
    assert!(animal.has_annotation("DiscriminatorColumn"));
    assert!(animal.has_field("id"));
    assert!(animal.has_field("createdAt"));

    let dog = descriptor(&output, "Dog");
    assert!(!dog.is_abstract);
    assert_eq!(dog.superclass.as_deref(), Some("Animal"));
    assert!(!dog.has_annotation("Table"));
    assert_eq!(
        dog.annotation("DiscriminatorValue").unwrap().to_string(),
        "@DiscriminatorValue(\"Dog\")"
    );
    assert_eq!(dog.field_names(), vec!["breed"]);

    let dog_dto = descriptor(&output, "DogDTO");
    assert_eq!(dog_dto.field_names(), vec!["id", "name", "breed"]);
}

#[test]
fn test_multi_level_inheritance() {
    let output = generate(
        vec![
            class("a", "Animal", json!([{ "name": "name", "type": "String" }])),
            class("m", "Mammal", json!([{ "name": "fur color", "type": "String" }])),
            class("d", "Dog", json!([{ "name": "breed", "type": "String" }])),
        ],
        vec![
            edge("e1", "d", "m", "INHERITANCE", "", ""),
            edge("e2", "m", "a", "INHERITANCE", "", ""),
        ],
    );

    let animal = descriptor(&output, "Animal");
    assert!(animal.is_abstract);
    assert_eq!(
        animal.annotation("Inheritance").unwrap().argument("strategy"),
        Some("InheritanceType.SINGLE_TABLE")
    );
    assert!(animal.has_annotation("Table"));
    assert_eq!(animal.field_names(), vec!["id", "name", "createdAt", "updatedAt"]);

    let mammal = descriptor(&output, "Mammal");
    assert!(mammal.is_abstract);
    assert_eq!(mammal.superclass.as_deref(), Some("Animal"));
    assert_eq!(
        mammal.annotation("DiscriminatorValue").unwrap().to_string(),
        "@DiscriminatorValue(\"Mammal\")"
    );
    assert!(!mammal.has_annotation("Inheritance"));
    assert!(!mammal.has_annotation("DiscriminatorColumn"));
    assert!(!mammal.has_annotation("Table"));
    assert_eq!(mammal.field_names(), vec!["furColor"]);

    let dog = descriptor(&output, "Dog");
    assert!(!dog.is_abstract);
    assert_eq!(dog.superclass.as_deref(), Some("Mammal"));
    assert!(!dog.has_annotation("Inheritance"));
    assert_eq!(dog.field_names(), vec!["breed"]);

    assert_eq!(
        descriptor(&output, "DogDTO").field_names(),
        vec!["id", "name", "furColor", "breed"]
    );
}

#[test]
fn test_subclass_relation_never_remaps_inherited_column() {
    let output = generate(
        vec![
            class("o", "Owner", json!([])),
            class("a", "Animal", json!([])),
            class("d", "Dog", json!([])),
        ],
        vec![
            edge("e1", "d", "a", "INHERITANCE", "", ""),
            edge("e2", "a", "o", "ASSOCIATION", "*", "1"),
            edge("e3", "d", "o", "ASSOCIATION", "*", "1"),
        ],
    );

    let animal = descriptor(&output, "Animal");
    assert_eq!(animal.field_names(), vec!["id", "owner", "createdAt", "updatedAt"]);

    let dog = descriptor(&output, "Dog");
    assert_eq!(dog.field_names(), vec!["owner2"]);
    assert_eq!(
        dog.field("owner2").unwrap().annotation("JoinColumn").unwrap().argument("name"),
        Some("\"owner2_id\"")
    );
    assert_eq!(
        descriptor(&output, "DogDTO").field_names(),
        vec!["id", "ownerId", "owner2Id"]
    );

    let dogs = descriptor(&output, "Owner").field("dogs").unwrap();
    assert_eq!(
        dogs.annotation("OneToMany").unwrap().argument("mappedBy"),
        Some("\"owner2\"")
    );
    assert!(output.diagnostics.has_code(DiagnosticCode::RelationFieldRenamed));
}

#[test]
fn test_subclass_drops_inherited_attribute() {
    let output = generate(
        vec![
            class("a", "Animal", json!([{ "name": "name", "type": "String" }])),
            class("c", "Cat", json!([{ "name": "name", "type": "String" }, { "name": "lives", "type": "Integer" }])),
        ],
        vec![edge("e1", "c", "a", "INHERITANCE", "", "")],
    );
    assert_eq!(descriptor(&output, "Cat").field_names(), vec!["lives"]);
    assert!(output.diagnostics.has_code(DiagnosticCode::DuplicateAttributeDropped));
}

// =============================================================================
// Composition
// =============================================================================

#[test]
fn test_composition_cascades_and_requires_parent() {
    let output = generate(
        vec![
            class("o", "Order", json!([])),
            class("i", "OrderItem", json!([{ "name": "quantity", "type": "Integer" }])),
        ],
        vec![edge("e1", "o", "i", "COMPOSITION", "1", "*")],
    );

    let order = descriptor(&output, "Order");
    let items = order.field("orderItems").unwrap();
    let mapping = items.annotation("OneToMany").unwrap();
    assert_eq!(mapping.argument("cascade"), Some("CascadeType.ALL"));
    assert_eq!(mapping.argument("orphanRemoval"), Some("true"));
    assert_eq!(mapping.argument("mappedBy"), Some("\"order\""));

    let item = descriptor(&output, "OrderItem");
    let parent = item.field("order").unwrap();
    assert!(parent.relation.as_ref().unwrap().required);
    assert_eq!(parent.annotation("ManyToOne").unwrap().argument("optional"), Some("false"));
    assert_eq!(parent.annotation("JoinColumn").unwrap().argument("nullable"), Some("false"));

    let item_dto = descriptor(&output, "OrderItemDTO");
    assert!(item_dto.field("orderId").unwrap().has_annotation("NotNull"));
}

#[test]
fn test_many_to_many_composition_is_downgraded() {
    let output = generate(
        vec![class("a", "Album", json!([])), class("s", "Song", json!([]))],
        vec![edge("e1", "a", "s", "COMPOSITION", "*", "*")],
    );
    let album = descriptor(&output, "Album");
    let songs = album.field("songs").unwrap();
    assert!(songs.annotation("ManyToMany").unwrap().argument("cascade").is_none());
    assert!(songs.has_annotation("JoinTable"));
    assert!(output.diagnostics.has_code(DiagnosticCode::CompositionDowngraded));
}

// =============================================================================
// DTO shape
// =============================================================================

#[test]
fn test_dtos_never_expose_collections() {
    let output = generate(
        vec![
            class("s", "Student", json!([])),
            class("c", "Course", json!([])),
            class("t", "Teacher", json!([])),
        ],
        vec![
            edge("e1", "s", "c", "ASSOCIATION", "*", "*"),
            edge("e2", "t", "c", "AGGREGATION", "1", "0..*"),
        ],
    );

    for dto in output.descriptors.iter().filter(|d| d.name.ends_with("DTO")) {
        assert!(
            dto.fields.iter().all(|f| !is_collection(f)),
            "{} exposes a collection",
            dto.name
        );
    }
    assert!(!descriptor(&output, "StudentDTO").has_field("courses"));
    assert!(!descriptor(&output, "CourseDTO").has_field("students"));
    assert!(!descriptor(&output, "TeacherDTO").has_field("courses"));
    assert_eq!(descriptor(&output, "CourseDTO").field_names(), vec!["id", "teacherId"]);
}

// =============================================================================
// End-to-end
// =============================================================================

#[test]
fn test_customer_order_scenario() {
    let output = generate(
        vec![
            class("c", "Customer", json!([])),
            class("o", "Order", json!([{ "name": "total", "type": "Double" }])),
        ],
        vec![edge("e1", "c", "o", "ASSOCIATION", "1", "*")],
    );

    assert_eq!(
        descriptor(&output, "OrderDTO").field_names(),
        vec!["id", "total", "customerId"]
    );
    assert_eq!(descriptor(&output, "CustomerDTO").field_names(), vec!["id"]);

    let service = descriptor(&output, "OrderService");
    let lookup = service.field("customerRepository").unwrap();
    assert_eq!(lookup.type_name, "CustomerRepository");
    assert!(lookup.is_final);

    for method in ["save", "update"] {
        let method = service.method(method).unwrap();
        assert_eq!(method.resolutions.len(), 1);
        let resolution = &method.resolutions[0];
        assert_eq!(resolution.dto_field, "customerId");
        assert_eq!(resolution.entity_field, "customer");
        assert_eq!(resolution.related_class, "Customer");
        assert_eq!(resolution.lookup, "customerRepository");
        assert_eq!(resolution.not_found, "Customer not found with id: ");
    }
    assert!(service.method("findAll").unwrap().resolutions.is_empty());

    let customer_service = descriptor(&output, "CustomerService");
    assert_eq!(customer_service.field_names(), vec!["customerRepository"]);

    let order_model = output.client_model("Order").unwrap();
    assert_eq!(order_model.field_names(), vec!["id", "total", "customerId"]);
    assert_eq!(order_model.selectors[0].provider, "CustomerProvider");
    assert_eq!(order_model.selectors[0].display_field, "id");
    assert!(output.diagnostics.is_empty());
}
