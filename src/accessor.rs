//! Ordered metadata lookup across types, superclasses and implemented traits.
//!
//! Lookup chains are computed once per type (or method) and then queried per
//! metadata kind. Each kind resolves independently: the first declaration found
//! along the chain wins for that kind only.

use crate::metadata::Annotations;
use crate::resource::{Argument, MetadataProvider, ResourceKind, ResourceMethod, ResourceType};
use log::debug;
use std::collections::HashSet;

/// Lookup chain for class-level metadata.
///
/// Order: the type itself, its superclasses (nearest first), then every trait
/// implemented along that line (and their supertraits), each type at most once.
pub struct ClassChain<'a> {
    root: &'a ResourceType,
    /// Root followed by its superclasses
    lineage: Vec<&'a ResourceType>,
    chain: Vec<&'a ResourceType>,
}

impl<'a> ClassChain<'a> {
    pub fn new<P: MetadataProvider + ?Sized>(provider: &'a P, root: &'a ResourceType) -> Self {
        let mut seen = HashSet::new();
        seen.insert(root.name.as_str());

        let mut lineage = vec![root];
        let mut current = root;
        while let Some(super_name) = &current.superclass {
            if !seen.insert(super_name.as_str()) {
                debug!("Superclass cycle through {} ignored", super_name);
                break;
            }
            match provider.lookup(super_name) {
                Some(parent) => {
                    lineage.push(parent);
                    current = parent;
                }
                None => {
                    debug!("Superclass {} of {} is unknown", super_name, current.name);
                    break;
                }
            }
        }

        let mut chain = lineage.clone();
        let mut pending: Vec<&str> = lineage
            .iter()
            .copied()
            .flat_map(|t| t.interfaces.iter().map(String::as_str))
            .collect();
        let mut next = 0;
        while next < pending.len() {
            let name = pending[next];
            next += 1;
            if !seen.insert(name) {
                continue;
            }
            if let Some(interface) = provider.lookup(name) {
                chain.push(interface);
                pending.extend(interface.interfaces.iter().map(String::as_str));
            }
        }

        Self {
            root,
            lineage,
            chain,
        }
    }

    pub fn root(&self) -> &'a ResourceType {
        self.root
    }

    /// Types in lookup order
    pub fn types(&self) -> &[&'a ResourceType] {
        &self.chain
    }

    /// First declaration of a metadata kind along the chain
    pub fn resolve<T>(&self, field: impl Fn(&'a Annotations) -> Option<T>) -> Option<T> {
        self.chain.iter().copied().find_map(|t| field(&t.annotations))
    }

    /// Methods of the root type, then inherited superclass methods, then the
    /// default-bodied methods of implemented traits.
    ///
    /// A method declared closer to the root shadows later methods of the same
    /// name. Each method is paired with the type that declares it.
    pub fn methods(&self) -> Vec<(&'a ResourceType, &'a ResourceMethod)> {
        let mut seen = HashSet::new();
        let mut methods = Vec::new();
        for &declaring in self.lineage.iter().filter(|t| t.kind == ResourceKind::Struct) {
            for method in &declaring.methods {
                if seen.insert(method.name.as_str()) {
                    methods.push((declaring, method));
                }
            }
        }
        for &declaring in self.chain.iter().filter(|t| t.kind == ResourceKind::Trait) {
            for method in declaring.methods.iter().filter(|m| m.has_body) {
                if seen.insert(method.name.as_str()) {
                    methods.push((declaring, method));
                }
            }
        }
        methods
    }
}

/// Lookup chain for method-level metadata.
///
/// Order: the method itself, then the same-signature method on each trait
/// directly implemented by the declaring type, in declaration order.
pub struct MethodChain<'a> {
    chain: Vec<&'a ResourceMethod>,
}

impl<'a> MethodChain<'a> {
    pub fn new<P: MetadataProvider + ?Sized>(
        provider: &'a P,
        declaring: &'a ResourceType,
        method: &'a ResourceMethod,
    ) -> Self {
        let mut chain = vec![method];
        for interface_name in &declaring.interfaces {
            let inherited = provider
                .lookup(interface_name)
                .and_then(|iface| iface.find_method(&method.name, method.arguments.len()));
            if let Some(inherited) = inherited {
                debug!(
                    "Method {}::{} inherits metadata from {}",
                    declaring.name, method.name, interface_name
                );
                chain.push(inherited);
            }
        }
        Self { chain }
    }

    /// The method being documented
    pub fn method(&self) -> &'a ResourceMethod {
        self.chain[0]
    }

    /// First declaration of a metadata kind along the chain
    pub fn resolve<T>(&self, field: impl Fn(&'a Annotations) -> Option<T>) -> Option<T> {
        self.chain.iter().copied().find_map(|m| field(&m.annotations))
    }

    /// The argument at `index`, taking metadata from the first method in the
    /// chain that declares any for that position.
    pub fn argument(&self, index: usize) -> Option<&'a Argument> {
        let own = self.method().arguments.get(index)?;
        if own.has_metadata() {
            return Some(own);
        }
        let inherited = self
            .chain
            .iter()
            .copied()
            .skip(1)
            .filter_map(|m| m.arguments.get(index))
            .find(|a| a.has_metadata());
        Some(inherited.unwrap_or(own))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ParameterBinding, ParameterIn, TypeInfo};
    use crate::resource::ResourceCatalog;

    fn tagged(name: &str, kind: ResourceKind, tags: Option<&str>) -> ResourceType {
        let mut t = ResourceType::new(name, kind);
        t.annotations.tags = tags.map(|tag| vec![tag.to_string()]);
        t
    }

    #[test]
    fn test_class_chain_order() {
        let mut catalog = ResourceCatalog::new();
        let mut leaf = tagged("Leaf", ResourceKind::Struct, None);
        leaf.superclass = Some("Base".to_string());
        leaf.interfaces = vec!["LeafApi".to_string()];
        let mut base = tagged("Base", ResourceKind::Struct, None);
        base.interfaces = vec!["BaseApi".to_string()];
        catalog.insert(leaf);
        catalog.insert(base);
        catalog.insert(tagged("LeafApi", ResourceKind::Trait, Some("leaf")));
        catalog.insert(tagged("BaseApi", ResourceKind::Trait, Some("base")));

        let leaf = catalog.lookup("Leaf").unwrap();
        let chain = ClassChain::new(&catalog, leaf);
        let names: Vec<_> = chain.types().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Leaf", "Base", "LeafApi", "BaseApi"]);
        assert_eq!(chain.resolve(|a| a.tags.clone()), Some(vec!["leaf".to_string()]));
    }

    #[test]
    fn test_superclass_wins_over_interface() {
        let mut catalog = ResourceCatalog::new();
        let mut leaf = tagged("Leaf", ResourceKind::Struct, None);
        leaf.superclass = Some("Base".to_string());
        leaf.interfaces = vec!["Api".to_string()];
        catalog.insert(leaf);
        catalog.insert(tagged("Base", ResourceKind::Struct, Some("base")));
        catalog.insert(tagged("Api", ResourceKind::Trait, Some("api")));

        let chain = ClassChain::new(&catalog, catalog.lookup("Leaf").unwrap());
        assert_eq!(chain.resolve(|a| a.tags.clone()), Some(vec!["base".to_string()]));
    }

    #[test]
    fn test_superclass_cycle_terminates() {
        let mut catalog = ResourceCatalog::new();
        let mut a = ResourceType::new("A", ResourceKind::Struct);
        a.superclass = Some("B".to_string());
        let mut b = ResourceType::new("B", ResourceKind::Struct);
        b.superclass = Some("A".to_string());
        catalog.insert(a);
        catalog.insert(b);

        let chain = ClassChain::new(&catalog, catalog.lookup("A").unwrap());
        assert_eq!(chain.types().len(), 2);
    }

    #[test]
    fn test_inherited_methods_are_shadowed() {
        let mut catalog = ResourceCatalog::new();
        let mut leaf = ResourceType::new("Leaf", ResourceKind::Struct);
        leaf.superclass = Some("Base".to_string());
        leaf.methods.push(ResourceMethod::new("get"));
        let mut base = ResourceType::new("Base", ResourceKind::Struct);
        base.methods.push(ResourceMethod::new("get"));
        base.methods.push(ResourceMethod::new("ping"));
        catalog.insert(leaf);
        catalog.insert(base);

        let chain = ClassChain::new(&catalog, catalog.lookup("Leaf").unwrap());
        let methods: Vec<_> = chain
            .methods()
            .iter()
            .map(|(t, m)| format!("{}::{}", t.name, m.name))
            .collect();
        assert_eq!(methods, vec!["Leaf::get", "Base::ping"]);
    }

    #[test]
    fn test_default_trait_methods_follow_own_methods() {
        let mut catalog = ResourceCatalog::new();
        let mut resource = ResourceType::new("Svc", ResourceKind::Struct);
        resource.interfaces = vec!["Api".to_string()];
        resource.methods.push(ResourceMethod::new("status"));
        let mut api = ResourceType::new("Api", ResourceKind::Trait);
        let mut ping = ResourceMethod::new("ping");
        ping.has_body = true;
        let mut status = ResourceMethod::new("status");
        status.has_body = true;
        api.methods = vec![ping, ResourceMethod::new("required"), status];
        catalog.insert(resource);
        catalog.insert(api);

        let chain = ClassChain::new(&catalog, catalog.lookup("Svc").unwrap());
        let methods: Vec<_> = chain
            .methods()
            .iter()
            .map(|(t, m)| format!("{}::{}", t.name, m.name))
            .collect();
        assert_eq!(methods, vec!["Svc::status", "Api::ping"]);
    }

    #[test]
    fn test_method_chain_resolves_kinds_independently() {
        let mut catalog = ResourceCatalog::new();
        let mut resource = ResourceType::new("Pets", ResourceKind::Struct);
        resource.interfaces = vec!["PetApi".to_string()];
        let mut method = ResourceMethod::new("find");
        method.annotations.summary = Some("own summary".to_string());
        method
            .arguments
            .push(Argument::new(Some("id".to_string()), TypeInfo::new("u64")));
        resource.methods.push(method);

        let mut api = ResourceType::new("PetApi", ResourceKind::Trait);
        let mut declared = ResourceMethod::new("find");
        declared.annotations.summary = Some("api summary".to_string());
        declared.annotations.description = Some("api description".to_string());
        let mut arg = Argument::new(Some("id".to_string()), TypeInfo::new("u64"));
        arg.binding = Some(ParameterBinding {
            location: ParameterIn::Path,
            name: Some("petId".to_string()),
        });
        declared.arguments.push(arg);
        api.methods.push(declared);

        catalog.insert(resource);
        catalog.insert(api);

        let resource = catalog.lookup("Pets").unwrap();
        let chain = MethodChain::new(&catalog, resource, &resource.methods[0]);
        assert_eq!(chain.resolve(|a| a.summary.clone()).as_deref(), Some("own summary"));
        assert_eq!(
            chain.resolve(|a| a.description.clone()).as_deref(),
            Some("api description")
        );
        let binding = chain.argument(0).and_then(|a| a.binding.as_ref()).unwrap();
        assert_eq!(binding.name.as_deref(), Some("petId"));
        assert!(chain.argument(1).is_none());
    }
}
