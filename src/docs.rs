//! OpenAPI document generated from the resource registry.

use crate::resource::{FieldDef, FieldKind, ResourceDef, ResourceRegistry, UpdateMode};
use utoipa::openapi::path::{
    HttpMethod, Operation, OperationBuilder, ParameterBuilder, ParameterIn, PathItemBuilder,
};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::schema::{Array, KnownFormat, ObjectBuilder, Schema, SchemaFormat, Type};
use utoipa::openapi::tag::TagBuilder;
use utoipa::openapi::{
    ComponentsBuilder, ContentBuilder, InfoBuilder, OpenApi, OpenApiBuilder, PathsBuilder, Ref,
    RefOr, Required, ResponseBuilder,
};

const JSON: &str = "application/json";

pub fn openapi(registry: &ResourceRegistry) -> OpenApi {
    let mut paths = PathsBuilder::new();
    let mut components = ComponentsBuilder::new();
    let mut tags = Vec::new();

    for r in registry.resources() {
        components = components.schema(r.name, record_schema(r));
        tags.push(
            TagBuilder::new()
                .name(r.name)
                .description(Some(format!("Manage {}", r.path_segment.replace('-', " "))))
                .build(),
        );

        let collection = PathItemBuilder::new()
            .operation(HttpMethod::Get, list_op(r))
            .operation(HttpMethod::Post, create_op(r))
            .build();
        let item = PathItemBuilder::new()
            .operation(HttpMethod::Put, update_op(r, "put"))
            .operation(HttpMethod::Patch, update_op(r, "patch"))
            .operation(HttpMethod::Delete, delete_op(r))
            .build();
        paths = paths
            .path(format!("/{}", r.path_segment), collection)
            .path(format!("/{}/{{id}}", r.path_segment), item);
    }

    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title("Resume API")
                .version(env!("CARGO_PKG_VERSION"))
                .description(Some("Education, hobbies, languages, projects, references, skills and work experience"))
                .build(),
        )
        .paths(paths.build())
        .components(Some(components.build()))
        .tags(Some(tags))
        .build()
}

fn object(b: ObjectBuilder) -> RefOr<Schema> {
    RefOr::T(Schema::Object(b.build()))
}

fn schema_ref(r: &ResourceDef) -> RefOr<Schema> {
    RefOr::Ref(Ref::from_schema_name(r.name))
}

fn record_schema(r: &ResourceDef) -> RefOr<Schema> {
    let mut b = ObjectBuilder::new().schema_type(Type::Object).property(
        "id",
        object(
            ObjectBuilder::new()
                .schema_type(Type::Integer)
                .read_only(Some(true))
                .description(Some("Assigned by the server")),
        ),
    );
    for f in &r.fields {
        b = b.property(f.api_name, object(field_schema(f)));
        if f.required {
            b = b.required(f.api_name);
        }
    }
    object(b)
}

fn field_schema(f: &FieldDef) -> ObjectBuilder {
    let b = ObjectBuilder::new()
        .description((!f.description.is_empty()).then_some(f.description))
        .default(f.default.as_ref().map(|d| d.to_value()));
    match &f.kind {
        FieldKind::Text => b.schema_type(Type::String),
        FieldKind::Date => b
            .schema_type(Type::String)
            .format(Some(SchemaFormat::KnownFormat(KnownFormat::Date))),
        FieldKind::Integer { min, max } => b
            .schema_type(Type::Integer)
            .minimum(Some(*min as f64))
            .maximum(Some(*max as f64)),
        FieldKind::Choice { allowed } => b
            .schema_type(Type::String)
            .enum_values(Some(allowed.iter().copied())),
    }
}

fn json_body(r: &ResourceDef, required: bool) -> utoipa::openapi::request_body::RequestBody {
    RequestBodyBuilder::new()
        .content(JSON, ContentBuilder::new().schema(Some(schema_ref(r))).build())
        .required(Some(if required { Required::True } else { Required::False }))
        .build()
}

fn response(description: &str) -> ResponseBuilder {
    ResponseBuilder::new().description(description)
}

fn id_param() -> ParameterBuilder {
    ParameterBuilder::new()
        .name("id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .schema(Some(object(ObjectBuilder::new().schema_type(Type::Integer))))
}

fn list_op(r: &ResourceDef) -> Operation {
    let many = RefOr::T(Schema::Array(Array::new(schema_ref(r))));
    OperationBuilder::new()
        .tag(r.name)
        .summary(Some(format!("List all {}", r.path_segment.replace('-', " "))))
        .response(
            "200",
            response("Every stored record")
                .content(JSON, ContentBuilder::new().schema(Some(many)).build())
                .build(),
        )
        .response("500", response("Storage failure").build())
        .build()
}

fn create_op(r: &ResourceDef) -> Operation {
    OperationBuilder::new()
        .tag(r.name)
        .summary(Some(format!("Create a {}", r.name)))
        .request_body(Some(json_body(r, true)))
        .response(
            r.create_status.as_str(),
            response("Created record")
                .content(JSON, ContentBuilder::new().schema(Some(schema_ref(r))).build())
                .build(),
        )
        .response("400", response("Missing or invalid field").build())
        .response("500", response("Storage failure").build())
        .build()
}

fn update_op(r: &ResourceDef, verb: &str) -> Operation {
    let summary = match r.update_mode {
        UpdateMode::ReplaceAll => format!("Replace a {} (all required fields)", r.name),
        UpdateMode::MergeUpdate => format!("Update a {} (supplied fields only)", r.name),
    };
    OperationBuilder::new()
        .tag(r.name)
        .operation_id(Some(format!("{}_{}", verb, r.path_segment.replace('-', "_"))))
        .summary(Some(summary))
        .parameter(id_param())
        .request_body(Some(json_body(r, true)))
        .response(
            "200",
            response("Updated record")
                .content(JSON, ContentBuilder::new().schema(Some(schema_ref(r))).build())
                .build(),
        )
        .response("400", response("Missing or invalid field").build())
        .response("404", response(&r.not_found_message()).build())
        .response("500", response("Storage failure").build())
        .build()
}

fn delete_op(r: &ResourceDef) -> Operation {
    OperationBuilder::new()
        .tag(r.name)
        .summary(Some(format!("Delete a {}", r.name)))
        .parameter(id_param())
        .response("204", response("Deleted, or already absent").build())
        .response("500", response("Storage failure").build())
        .build()
}
