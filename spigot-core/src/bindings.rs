use crate::{Binding, Error, PositionalBinding, Result};
use std::collections::BTreeMap;

/// Immutable association from parameter name to its [`PositionalBinding`].
///
/// Every bind operation returns a new accumulator and leaves the receiver
/// untouched, so builder chains can branch: several fully bound variants can
/// fan out from one partially bound prototype. A name may be bound at most
/// once per accumulator; rebinding is a caller error, never a silent
/// overwrite.
#[derive(Clone, Debug, Default)]
pub struct Bindings {
    map: BTreeMap<String, PositionalBinding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// New accumulator with `name` bound to a single value.
    pub fn value_binding(&self, name: impl Into<String>, binding: Binding) -> Result<Self> {
        self.insert(name.into(), PositionalBinding::Value(binding))
    }

    /// New accumulator with `name` bound to a list, one placeholder per
    /// element.
    pub fn list_binding(&self, name: impl Into<String>, bindings: Vec<Binding>) -> Result<Self> {
        self.insert(name.into(), PositionalBinding::List(bindings))
    }

    fn insert(&self, name: String, binding: PositionalBinding) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::invalid_argument("parameter name must not be empty"));
        }
        if self.map.contains_key(&name) {
            return Err(Error::invalid_argument(format!(
                "parameter :{} is already bound",
                name
            )));
        }
        let mut map = self.map.clone();
        map.insert(name, binding);
        Ok(Self { map })
    }

    /// New accumulator holding the union of both; any name bound on both
    /// sides fails like a direct rebind would.
    pub fn merge(&self, other: &Bindings) -> Result<Self> {
        let mut merged = self.clone();
        for (name, binding) in &other.map {
            merged = merged.insert(name.clone(), binding.clone())?;
        }
        Ok(merged)
    }

    pub fn get(&self, name: &str) -> Result<&PositionalBinding> {
        self.map.get(name).ok_or_else(|| {
            Error::invalid_argument(format!("no binding for parameter :{}", name))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Bound parameter names, value- and list-bound alike.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
