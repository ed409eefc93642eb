//! Explicit-order sorting.
//!
//! Every schema entity carries an `order` field. Synthesis walks entities in
//! ascending order, with ties kept in source order (`sort_by_key` is stable).

use crate::schema::{
    Attribute, BuiltinType, Class, Concept, Define, Event, GlobalObject, Method, NamedOption,
    Parameter, ReturnValue, UnionOption, VariantParameterGroup,
};

/// An entity with an explicit order field.
pub trait Ordered {
    fn order(&self) -> u32;
}

macro_rules! impl_ordered {
    ($($ty:ty),* $(,)?) => {
        $(impl Ordered for $ty {
            fn order(&self) -> u32 {
                self.order
            }
        })*
    };
}

impl_ordered!(
    BuiltinType,
    Class,
    Concept,
    Event,
    Define,
    GlobalObject,
    Method,
    Attribute,
    Parameter,
    ReturnValue,
    NamedOption,
    UnionOption,
    VariantParameterGroup,
);

/// Returns references to `items` sorted by their order field.
///
/// # Examples
///
/// ```
/// use api_decl_core::{NamedOption, sorted_by_order};
///
/// let items = vec![
///     NamedOption::new("x", 2),
///     NamedOption::new("y", 0),
///     NamedOption::new("z", 1),
/// ];
/// let names: Vec<&str> = sorted_by_order(&items).iter().map(|o| o.name.as_str()).collect();
/// assert_eq!(names, vec!["y", "z", "x"]);
/// ```
pub fn sorted_by_order<T: Ordered>(items: &[T]) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| item.order());
    sorted
}
