use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use tera::Tera;
use tracing::{debug, info};

use crate::config::{Granularity, OutputConfig, TemplateConfig};
use crate::error::{JavabindError, Result};
use super::resolver::ClassMap;
use super::types::{ClassDefinition, ClassKind, PrimitiveKind, Signature, TypeReference};

const CLASS_TEMPLATE: &str = "class.tera";
const PACKAGE_TEMPLATE: &str = "package.tera";

/// Template-driven emitter: turns a finished class map into one
/// output source file per class or per package, plus per-class JSON
/// dumps. The map is consumed read-only.
pub struct CodeWriter {
    tera: Tera,
    extension: String,
}

impl CodeWriter {
    pub fn new(templates: &TemplateConfig, output: &OutputConfig) -> Result<Self> {
        let template_dir = templates
            .template_dir
            .clone()
            .unwrap_or_else(|| "templates".into());
        let pattern = template_dir.join("**").join("*.tera");
        let tera = Tera::new(&pattern.to_string_lossy())?;

        for required in [CLASS_TEMPLATE, PACKAGE_TEMPLATE] {
            if !tera.get_template_names().any(|name| name == required) {
                return Err(JavabindError::Config(format!(
                    "missing template {} in {}",
                    required,
                    template_dir.display()
                )));
            }
        }

        Ok(Self {
            tera,
            extension: output.extension.clone(),
        })
    }

    /// Dump every class definition (included and leaf alike) as
    /// `<shortName>.json`, pretty-printed, discovery field order.
    pub fn write_jsons(&self, map: &ClassMap, out_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(out_dir)?;
        for definition in map.all().values() {
            let path = out_dir.join(format!("{}.json", definition.short_name));
            let json = serde_json::to_string_pretty(definition)?;
            std::fs::write(path, json)?;
        }
        debug!("Wrote {} JSON dumps to {}", map.len(), out_dir.display());
        Ok(())
    }

    /// One source file per included class.
    pub fn write_class_files(&self, map: &ClassMap, out_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(out_dir)?;
        let mut written = 0usize;
        for definition in map.included() {
            let view = ClassView::from_definition(definition);
            let mut context = tera::Context::new();
            context.insert("class", &view);
            let rendered = self.tera.render(CLASS_TEMPLATE, &context)?;

            let path = out_dir.join(format!("{}.{}", definition.short_name, self.extension));
            std::fs::write(path, rendered)?;
            written += 1;
        }
        info!("Wrote {} class files to {}", written, out_dir.display());
        Ok(())
    }

    /// One source file per package of included classes.
    pub fn write_package_files(&self, map: &ClassMap, out_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(out_dir)?;

        // Group in discovery order; first class of a package fixes
        // the package's position.
        let mut packages: IndexMap<String, Vec<ClassView>> = IndexMap::new();
        for definition in map.included() {
            let package = match definition.package() {
                "" => "_root".to_string(),
                name => name.to_string(),
            };
            packages
                .entry(package)
                .or_default()
                .push(ClassView::from_definition(definition));
        }

        for (package, classes) in &packages {
            let mut context = tera::Context::new();
            context.insert("package", package);
            context.insert("classes", classes);
            let rendered = self.tera.render(PACKAGE_TEMPLATE, &context)?;

            let path = out_dir.join(format!("{}.{}", package, self.extension));
            std::fs::write(path, rendered)?;
        }
        info!(
            "Wrote {} package files to {}",
            packages.len(),
            out_dir.display()
        );
        Ok(())
    }

    pub fn write(&self, map: &ClassMap, out_dir: &Path, granularity: Granularity) -> Result<()> {
        match granularity {
            Granularity::Class => self.write_class_files(map, out_dir),
            Granularity::Package => self.write_package_files(map, out_dir),
        }
    }
}

/// Flattened, display-ready projection of a [`ClassDefinition`] for
/// the template context. Type references come pre-rendered so the
/// templates stay declarative.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassView {
    short_name: String,
    full_name: String,
    package: String,
    kind: String,
    superclass: Option<String>,
    interfaces: Vec<String>,
    /// Short names of the supertypes worth surfacing in the target
    /// language (the runtime root type is implicit and omitted).
    extends: Vec<String>,
    generics: Vec<GenericView>,
    constructors: Vec<SignatureView>,
    methods: Vec<MethodGroupView>,
    fields: Vec<FieldView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenericView {
    name: String,
    bound: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MethodGroupView {
    name: String,
    overloads: Vec<SignatureView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignatureView {
    params: Vec<ParamView>,
    returns: String,
    ts_returns: String,
    is_static: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParamView {
    name: String,
    type_name: String,
    ts_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldView {
    name: String,
    type_name: String,
    ts_type: String,
}

impl ClassView {
    fn from_definition(definition: &ClassDefinition) -> Self {
        let kind = match definition.kind {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::PrimitiveAlias => "primitive-alias",
        };

        let mut extends = Vec::new();
        if let Some(superclass) = &definition.superclass {
            if superclass != "java.lang.Object" {
                extends.push(super::types::short_name_of(superclass).to_string());
            }
        }
        extends.extend(
            definition
                .interfaces
                .iter()
                .map(|name| super::types::short_name_of(name).to_string()),
        );

        Self {
            short_name: definition.short_name.clone(),
            full_name: definition.full_name.clone(),
            package: definition.package().to_string(),
            kind: kind.to_string(),
            superclass: definition.superclass.clone(),
            interfaces: definition.interfaces.clone(),
            extends,
            generics: definition
                .generics
                .iter()
                .map(|g| GenericView {
                    name: g.name.clone(),
                    bound: ts_type(&g.bound),
                })
                .collect(),
            constructors: definition
                .constructors
                .iter()
                .map(SignatureView::from_signature)
                .collect(),
            methods: definition
                .methods
                .iter()
                .map(|(name, overloads)| MethodGroupView {
                    name: name.clone(),
                    overloads: overloads.iter().map(SignatureView::from_signature).collect(),
                })
                .collect(),
            fields: definition
                .fields
                .iter()
                .map(|(name, reference)| FieldView {
                    name: name.clone(),
                    type_name: reference.type_name(),
                    ts_type: ts_type(reference),
                })
                .collect(),
        }
    }
}

impl SignatureView {
    fn from_signature(signature: &Signature) -> Self {
        Self {
            params: signature
                .params
                .iter()
                .enumerate()
                .map(|(i, reference)| ParamView {
                    name: format!("arg{}", i),
                    type_name: reference.type_name(),
                    ts_type: ts_type(reference),
                })
                .collect(),
            returns: signature.returns.type_name(),
            ts_returns: ts_type(&signature.returns),
            is_static: signature.is_static,
        }
    }
}

/// Map a type reference onto the target language's surface syntax.
fn ts_type(reference: &TypeReference) -> String {
    match reference {
        TypeReference::Primitive(kind) => match kind {
            PrimitiveKind::Void => "void".to_string(),
            PrimitiveKind::Boolean => "boolean".to_string(),
            PrimitiveKind::Char => "string".to_string(),
            _ => "number".to_string(),
        },
        TypeReference::Array(element) => format!("{}[]", ts_type(element)),
        TypeReference::Class(name) => match name.as_str() {
            "java.lang.String" => "string".to_string(),
            "java.lang.Object" => "any".to_string(),
            other => super::types::short_name_of(other).to_string(),
        },
    }
}
