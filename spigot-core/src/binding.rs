use crate::{AsValue, ParamTarget, Result, Value, separated_by};
use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

/// One parameter position of a live prepared statement, handed to a
/// [`Binding`] setter at write time. Tracks whether the setter actually
/// wrote, which backs the null-if-unset normalization.
pub struct Slot<'a> {
    target: &'a mut dyn ParamTarget,
    position: u64,
    written: bool,
}

impl Slot<'_> {
    /// 1-based position of this slot in the generated SQL.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Write a value into this slot.
    pub fn set(&mut self, value: impl AsValue) -> Result<()> {
        self.written = true;
        self.target.set_value(self.position, value.as_value())
    }

    /// Write an untyped SQL NULL into this slot.
    pub fn set_null(&mut self) -> Result<()> {
        self.set(Value::Null)
    }
}

/// A single-column setter capability, deferred until bind time.
///
/// The common case wraps one [`Value`] ([`Binding::value`]); custom setters
/// ([`Binding::with`]) receive the [`Slot`] and may decide not to write at
/// all, in which case the slot is explicitly set to SQL NULL rather than
/// left undefined.
#[derive(Clone)]
pub struct Binding {
    setter: Arc<dyn Fn(&mut Slot) -> Result<()> + Send + Sync>,
}

impl Binding {
    /// A binding that writes one value.
    pub fn value(value: impl AsValue) -> Self {
        let value = value.as_value();
        Self::with(move |slot| slot.set(value.clone()))
    }

    /// A binding that writes an untyped SQL NULL.
    pub fn null() -> Self {
        Self::with(|slot| slot.set_null())
    }

    /// A binding backed by an arbitrary setter function.
    pub fn with(setter: impl Fn(&mut Slot) -> Result<()> + Send + Sync + 'static) -> Self {
        Self {
            setter: Arc::new(setter),
        }
    }

    /// Runs the setter against `position` of `target`, normalizing a setter
    /// that never touched the slot into an explicit SQL NULL write.
    pub(crate) fn write(&self, target: &mut dyn ParamTarget, position: u64) -> Result<()> {
        let mut slot = Slot {
            target,
            position,
            written: false,
        };
        (self.setter)(&mut slot)?;
        if !slot.written {
            slot.set_null()?;
        }
        Ok(())
    }
}

impl Debug for Binding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Binding(..)")
    }
}

/// The resolved form of one named parameter: its placeholder fragment in the
/// generated SQL plus the value write(s) that fill it.
#[derive(Clone, Debug)]
pub enum PositionalBinding {
    /// Exactly one `?`, one write.
    Value(Binding),
    /// `(` + one comma-joined `?` per element + `)`; `()` for an empty
    /// list. Writes the elements in list order.
    List(Vec<Binding>),
}

impl PositionalBinding {
    /// Appends this binding's placeholder fragment.
    pub fn append_placeholder(&self, out: &mut String) {
        match self {
            PositionalBinding::Value(..) => out.push('?'),
            PositionalBinding::List(list) => {
                out.push('(');
                separated_by(out, list, ",", |out, _| out.push('?'));
                out.push(')');
            }
        }
    }

    /// Writes the value(s) starting at 1-based `position`, returning the
    /// next free position.
    pub fn write(&self, target: &mut dyn ParamTarget, position: u64) -> Result<u64> {
        match self {
            PositionalBinding::Value(binding) => {
                binding.write(target, position)?;
                Ok(position + 1)
            }
            PositionalBinding::List(list) => {
                let mut position = position;
                for binding in list {
                    binding.write(target, position)?;
                    position += 1;
                }
                Ok(position)
            }
        }
    }

    /// Number of `?` placeholders this binding contributes.
    pub fn placeholder_count(&self) -> usize {
        match self {
            PositionalBinding::Value(..) => 1,
            PositionalBinding::List(list) => list.len(),
        }
    }
}
