use std::collections::{HashSet, VecDeque};

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

use crate::error::{JavabindError, Result};
use super::filter::InclusionFilter;
use super::provider::ReflectionProvider;
use super::types::{
    ClassDefinition, ClassKind, ClassShape, GenericParam, Signature, TypeReference,
};

/// The finished result of a resolution run: every discovered class by
/// fully-qualified name, in discovery (BFS) order, plus the set of
/// names that were referenced but never fully expanded.
///
/// The map is built once, mutated only by [`ClassMapBuilder`], and is
/// read-only for every downstream consumer.
#[derive(Debug, Default)]
pub struct ClassMap {
    classes: IndexMap<String, ClassDefinition>,
    unhandled: IndexSet<String>,
}

impl ClassMap {
    pub fn get(&self, class_name: &str) -> Option<&ClassDefinition> {
        self.classes.get(class_name)
    }

    /// All definitions in discovery order.
    pub fn all(&self) -> &IndexMap<String, ClassDefinition> {
        &self.classes
    }

    /// Names referenced somewhere in the graph but never expanded,
    /// in the order they were encountered. A diagnostic, not an error.
    pub fn unhandled_types(&self) -> &IndexSet<String> {
        &self.unhandled
    }

    /// Definitions that were fully expanded, in discovery order.
    pub fn included(&self) -> impl Iterator<Item = &ClassDefinition> {
        self.classes.values().filter(|def| def.is_included)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// The closure engine: a cycle-safe worklist over the class reference
/// graph, whose edges are discovered lazily by reflecting one class at
/// a time.
///
/// Starting from the seed names, each pending class is reflected,
/// normalized, and mined for type references; newly discovered
/// in-scope names are appended to the queue. Every name is processed
/// at most once, so diamonds and cycles terminate. Seeds bypass the
/// inclusion filter and must resolve; everything else degrades to an
/// unhandled leaf on failure.
pub struct ClassMapBuilder<'a, P: ReflectionProvider> {
    provider: &'a P,
    filter: &'a InclusionFilter,
}

impl<'a, P: ReflectionProvider> ClassMapBuilder<'a, P> {
    pub fn new(provider: &'a P, filter: &'a InclusionFilter) -> Self {
        Self { provider, filter }
    }

    /// Run resolution to a fixed point. Discovery order is a
    /// breadth-first traversal seeded by `seeds` in the order given,
    /// which makes the result byte-stable across runs.
    pub fn build(&self, seeds: &[String]) -> Result<ClassMap> {
        if seeds.is_empty() {
            return Err(JavabindError::Config(
                "at least one seed class is required".to_string(),
            ));
        }

        let seed_set: HashSet<&str> = seeds.iter().map(String::as_str).collect();

        let mut pending: VecDeque<String> = VecDeque::new();
        // Everything ever queued; membership here means a name is
        // either pending or done, so nothing is enqueued twice.
        let mut queued: HashSet<String> = HashSet::new();
        let mut done: HashSet<String> = HashSet::new();
        let mut map = ClassMap::default();

        for seed in seeds {
            if queued.insert(seed.clone()) {
                pending.push_back(seed.clone());
            }
        }

        while let Some(class_name) = pending.pop_front() {
            // Idempotent re-discovery: a class reachable through two
            // parents is reflected exactly once.
            if !done.insert(class_name.clone()) {
                continue;
            }

            let is_seed = seed_set.contains(class_name.as_str());

            let shape = match self.provider.describe(&class_name) {
                Ok(shape) => shape,
                Err(JavabindError::ClassNotFound(_)) if is_seed => {
                    return Err(JavabindError::SeedNotFound(class_name));
                }
                Err(e) if is_seed => return Err(e),
                Err(e) => {
                    debug!("Downgrading {} to unhandled leaf: {}", class_name, e);
                    map.classes
                        .insert(class_name.clone(), ClassDefinition::leaf(&class_name, ClassKind::Class));
                    map.unhandled.insert(class_name);
                    continue;
                }
            };

            if !is_seed && !self.filter.should_expand(&class_name) {
                // Out-of-filter leaf: recorded but never expanded, so
                // the closure never grows past an excluded node.
                map.classes
                    .insert(class_name.clone(), ClassDefinition::leaf(&class_name, shape.kind));
                map.unhandled.insert(class_name);
                continue;
            }

            let (definition, referenced) = normalize(&shape);
            debug!(
                "Expanded {} ({} methods, {} referenced types)",
                class_name,
                definition.methods.len(),
                referenced.len()
            );
            map.classes.insert(class_name, definition);

            for name in referenced {
                if !done.contains(&name) && queued.insert(name.clone()) {
                    pending.push_back(name);
                }
            }
        }

        if !map.unhandled.is_empty() {
            warn!(
                "{} referenced types were not expanded",
                map.unhandled.len()
            );
        }

        Ok(map)
    }
}

/// Normalize a reflected shape into a [`ClassDefinition`] and the
/// ordered list of class names it references.
///
/// Reference extraction order is fixed (superclass, interfaces,
/// constructors, methods, fields, generic bounds; parameters before
/// return types) because it determines BFS discovery order.
fn normalize(shape: &ClassShape) -> (ClassDefinition, Vec<String>) {
    fn collect(reference: &TypeReference, out: &mut Vec<String>) {
        if let Some(name) = reference.class_name() {
            out.push(name.to_string());
        }
    }

    let mut referenced: Vec<String> = Vec::new();

    if let Some(superclass) = &shape.superclass {
        referenced.push(superclass.clone());
    }
    for interface in &shape.interfaces {
        referenced.push(interface.clone());
    }

    let mut constructors = Vec::with_capacity(shape.constructors.len());
    for ctor in &shape.constructors {
        let params: Vec<TypeReference> =
            ctor.params.iter().map(|p| TypeReference::parse(p)).collect();
        for param in &params {
            collect(param, &mut referenced);
        }
        constructors.push(Signature {
            params,
            // A constructor yields an instance of the defining class.
            returns: TypeReference::Class(shape.full_name.clone()),
            is_static: false,
        });
    }

    let mut methods: IndexMap<String, Vec<Signature>> = IndexMap::new();
    for method in &shape.methods {
        let params: Vec<TypeReference> =
            method.params.iter().map(|p| TypeReference::parse(p)).collect();
        let returns = TypeReference::parse(&method.returns);
        for param in &params {
            collect(param, &mut referenced);
        }
        collect(&returns, &mut referenced);
        methods.entry(method.name.clone()).or_default().push(Signature {
            params,
            returns,
            is_static: method.is_static,
        });
    }

    let mut fields: IndexMap<String, TypeReference> = IndexMap::new();
    for field in &shape.fields {
        let reference = TypeReference::parse(&field.field_type);
        collect(&reference, &mut referenced);
        fields.insert(field.name.clone(), reference);
    }

    let mut generics = Vec::with_capacity(shape.generics.len());
    for generic in &shape.generics {
        let bound = match &generic.bound {
            Some(bound) => TypeReference::parse(bound),
            // Unbounded parameters erase to the runtime's root type.
            None => TypeReference::Class("java.lang.Object".to_string()),
        };
        collect(&bound, &mut referenced);
        generics.push(GenericParam {
            name: generic.name.clone(),
            bound,
        });
    }

    let definition = ClassDefinition {
        short_name: super::types::short_name_of(&shape.full_name).to_string(),
        full_name: shape.full_name.clone(),
        kind: shape.kind,
        superclass: shape.superclass.clone(),
        interfaces: shape.interfaces.clone(),
        constructors,
        methods,
        fields,
        generics,
        is_included: true,
    };

    (definition, referenced)
}
