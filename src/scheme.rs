//! # Scheme Registration
//!
//! Maps (group, version, kind) to the API resource descriptor of every type
//! this crate serves. The process-wide scheme is built once on first access
//! and never mutated afterwards.

use crate::constants::{
    GROUP_NAME, OSB_INSTANCE_LIST_KIND, OSB_INSTANCE_RESOURCE_PLURAL,
    OSB_INSTANCE_RESOURCE_VERSION,
};
use crate::crd::OSBInstance;
use kube::core::{ApiResource, GroupVersion, GroupVersionKind};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// Group version used to register catalog objects
pub fn scheme_group_version() -> GroupVersion {
    GroupVersion::gv(GROUP_NAME, OSB_INSTANCE_RESOURCE_VERSION)
}

/// Group-qualified kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKind {
    pub group: String,
    pub kind: String,
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            f.write_str(&self.kind)
        } else {
            write!(f, "{}.{}", self.kind, self.group)
        }
    }
}

/// Qualify an unqualified kind with the catalog group
pub fn kind(kind: &str) -> GroupKind {
    GroupKind {
        group: GROUP_NAME.to_string(),
        kind: kind.to_string(),
    }
}

/// Registry of known resource types
#[derive(Debug, Default)]
pub struct Scheme {
    known_types: HashMap<GroupVersionKind, ApiResource>,
}

impl Scheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource; returns false if its kind was already known
    pub fn register(&mut self, resource: ApiResource) -> bool {
        let gvk = GroupVersionKind::gvk(&resource.group, &resource.version, &resource.kind);
        if self.known_types.contains_key(&gvk) {
            return false;
        }
        debug!(
            group = %gvk.group,
            version = %gvk.version,
            kind = %gvk.kind,
            "Registered known type"
        );
        self.known_types.insert(gvk, resource);
        true
    }

    pub fn lookup(&self, gvk: &GroupVersionKind) -> Option<&ApiResource> {
        self.known_types.get(gvk)
    }

    pub fn recognizes(&self, gvk: &GroupVersionKind) -> bool {
        self.known_types.contains_key(gvk)
    }

    /// Registered kinds, sorted by group, version and kind
    pub fn known_kinds(&self) -> Vec<GroupVersionKind> {
        let mut kinds: Vec<_> = self.known_types.keys().cloned().collect();
        kinds.sort_by(|a, b| {
            (&a.group, &a.version, &a.kind).cmp(&(&b.group, &b.version, &b.kind))
        });
        kinds
    }

    pub fn len(&self) -> usize {
        self.known_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known_types.is_empty()
    }
}

/// Add the catalog types (OSBInstance and its list) to a scheme
pub fn add_to_scheme(scheme: &mut Scheme) {
    scheme.register(ApiResource::erase::<OSBInstance>(&()));

    let list_gvk = scheme_group_version().with_kind(OSB_INSTANCE_LIST_KIND);
    scheme.register(ApiResource::from_gvk_with_plural(
        &list_gvk,
        OSB_INSTANCE_RESOURCE_PLURAL,
    ));
}

/// Process-wide scheme with the catalog types registered
pub fn scheme() -> &'static Scheme {
    static SCHEME: OnceLock<Scheme> = OnceLock::new();
    SCHEME.get_or_init(|| {
        let mut scheme = Scheme::new();
        add_to_scheme(&mut scheme);
        scheme
    })
}
