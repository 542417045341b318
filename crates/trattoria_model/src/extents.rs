//! One registry per entity kind.

use trattoria_foundation::{EntityId, EntityRef, Result};
use trattoria_storage::{ExtentSet, Record, Registry};

use crate::menu::{Ingredient, MenuItem};
use crate::orders::{Customer, Delivery, Order, Payment, Quantity};
use crate::persist::KindVisitor;
use crate::staff::Staff;
use crate::venue::{Menu, Restaurant, Shift, Table};

/// Access to the registry holding records of type `T`.
pub trait HasExtent<T: Record> {
    /// Returns the registry.
    fn extent(&self) -> &Registry<T>;

    /// Returns the registry for mutation.
    fn extent_mut(&mut self) -> &mut Registry<T>;
}

macro_rules! extents {
    ($($field:ident: $ty:ty),* $(,)?) => {
        /// The live extent of every entity kind.
        #[derive(Clone, Debug, Default)]
        pub struct Extents {
            $(
                #[doc = concat!("Live `", stringify!($ty), "` records.")]
                pub $field: Registry<$ty>,
            )*
        }

        $(
            impl HasExtent<$ty> for Extents {
                fn extent(&self) -> &Registry<$ty> {
                    &self.$field
                }

                fn extent_mut(&mut self) -> &mut Registry<$ty> {
                    &mut self.$field
                }
            }
        )*

        impl Extents {
            /// Kind names of every extent, in declaration order.
            pub const KINDS: &'static [&'static str] = &[$(<$ty as Record>::KIND),*];

            /// Returns the number of live records of a kind.
            #[must_use]
            pub fn count(&self, kind: &str) -> Option<usize> {
                $(
                    if kind == <$ty as Record>::KIND {
                        return Some(self.$field.len());
                    }
                )*
                None
            }

            /// Returns the live identities of a kind, in insertion order.
            #[must_use]
            pub fn ids(&self, kind: &str) -> Vec<EntityId> {
                $(
                    if kind == <$ty as Record>::KIND {
                        return self.$field.ids().collect();
                    }
                )*
                Vec::new()
            }

            /// Calls the visitor once per kind, in declaration order.
            ///
            /// # Errors
            ///
            /// Stops at and returns the visitor's first error.
            pub fn visit<V: KindVisitor>(visitor: &mut V) -> Result<()> {
                $(visitor.visit::<$ty>()?;)*
                Ok(())
            }

            /// Empties every extent.
            pub fn clear(&mut self) {
                $(self.$field.clear();)*
            }

            /// Returns true if every extent is empty.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_empty())*
            }
        }

        impl ExtentSet for Extents {
            fn contains(&self, entity: EntityRef) -> bool {
                $(
                    if entity.kind == <$ty as Record>::KIND {
                        return self.$field.contains(entity.id);
                    }
                )*
                false
            }

            fn remove(&mut self, entity: EntityRef) -> bool {
                $(
                    if entity.kind == <$ty as Record>::KIND {
                        return self.$field.remove(entity.id).is_some();
                    }
                )*
                false
            }
        }
    };
}

extents! {
    staff: Staff,
    restaurants: Restaurant,
    tables: Table,
    menus: Menu,
    shifts: Shift,
    menu_items: MenuItem,
    ingredients: Ingredient,
    customers: Customer,
    orders: Order,
    quantities: Quantity,
    payments: Payment,
    deliveries: Delivery,
}
