//! The generated `framework` package.

use crate::features::Features;
use crate::mapping::{attribute_type, block_type, element_type};
use crate::quote::go_quote;
use crate::writer::GoWriter;
use tfmigrate_schema::{Attribute, Block, SchemaModel};

const FRAMEWORK_MODULE: &str = "github.com/hashicorp/terraform-plugin-framework";

const PROVIDER_TYPE: &str = r#"var _ provider.Provider = (*fwprovider)(nil)

type fwprovider struct {
	Primary interface {
		Meta() interface{}
	}
}

func New(primary interface{ Meta() interface{} }) provider.Provider {
	return &fwprovider{Primary: primary}
}

"#;

const PROVIDER_METHODS: &str = r#"
func (p *fwprovider) Configure(_ context.Context, _ provider.ConfigureRequest, response *provider.ConfigureResponse) {
	response.DataSourceData = p.Primary.Meta()
	response.ResourceData = p.Primary.Meta()
}

func (p *fwprovider) DataSources(_ context.Context) []func() datasource.DataSource {
	return nil
}

func (p *fwprovider) Resources(_ context.Context) []func() resource.Resource {
	return nil
}
"#;

/// Render the framework provider for `model`.
///
/// The provider wraps the SDK provider's `Meta()` so both halves of the
/// muxed server share one configured client. It serves the configuration
/// schema only; resources and data sources stay on the SDK side.
pub fn render_framework_provider(model: &SchemaModel, provider_name: &str) -> String {
    let features = Features::of(model);
    let mut w = GoWriter::new();

    w.line("package framework");
    w.line("");
    w.open("import (");
    w.line("\"context\"");
    w.line("");
    let mut packages = vec!["datasource", "provider", "provider/schema", "resource"];
    if features.element_types {
        packages.push("types");
    }
    for package in packages {
        w.line(&format!("\"{FRAMEWORK_MODULE}/{package}\""));
    }
    w.close(")");
    w.line("");
    w.raw(PROVIDER_TYPE);

    w.open(
        "func (p *fwprovider) Metadata(_ context.Context, _ provider.MetadataRequest, response *provider.MetadataResponse) {",
    );
    w.line(&format!("response.TypeName = {}", go_quote(provider_name)));
    w.close("}");
    w.line("");

    w.open(
        "func (p *fwprovider) Schema(_ context.Context, _ provider.SchemaRequest, response *provider.SchemaResponse) {",
    );
    w.open("response.Schema = schema.Schema{");
    write_attribute_map(&mut w, model.attributes());
    if model.blocks().len() == 0 {
        w.field("Blocks", "map[string]schema.Block{}");
    } else {
        w.open("Blocks: map[string]schema.Block{");
        for block in model.blocks() {
            write_block(&mut w, block);
        }
        w.close("},");
    }
    w.close("}");
    w.close("}");

    w.raw(PROVIDER_METHODS);
    w.finish()
}

fn write_attribute_map<'m>(
    w: &mut GoWriter,
    attributes: impl ExactSizeIterator<Item = &'m Attribute>,
) {
    if attributes.len() == 0 {
        w.field("Attributes", "map[string]schema.Attribute{}");
        return;
    }
    w.open("Attributes: map[string]schema.Attribute{");
    for attr in attributes {
        write_attribute(w, attr);
    }
    w.close("},");
}

/// `"name": schema.XAttribute{...},` with flags emitted only when true.
fn write_attribute(w: &mut GoWriter, attr: &Attribute) {
    let mut fields: Vec<(&str, String)> = Vec::new();
    if !attr.description.is_empty() {
        fields.push(("Description", go_quote(&attr.description)));
    }
    for (flag, set) in [
        ("Required", attr.required),
        ("Optional", attr.optional),
        ("Computed", attr.computed),
        ("Sensitive", attr.sensitive),
    ] {
        if set {
            fields.push((flag, "true".to_string()));
        }
    }
    if let Some(elem) = attr.ty.element() {
        fields.push(("ElementType", element_type(elem).to_string()));
    }

    let key = go_quote(&attr.name);
    let ty = attribute_type(attr.ty);
    if fields.is_empty() {
        w.field(&key, &format!("schema.{ty}{{}}"));
        return;
    }
    w.open(&format!("{key}: schema.{ty}{{"));
    for (name, value) in &fields {
        w.field(name, value);
    }
    w.close("},");
}

fn write_block(w: &mut GoWriter, block: &Block) {
    w.open(&format!(
        "{}: schema.{}{{",
        go_quote(&block.name),
        block_type(block.kind)
    ));
    if !block.description.is_empty() {
        w.field("Description", &go_quote(&block.description));
    }
    w.open("NestedObject: schema.NestedBlockObject{");
    write_attribute_map(w, block.attributes());
    w.close("},");
    w.close("},");
}
