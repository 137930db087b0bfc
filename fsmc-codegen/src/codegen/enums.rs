use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::{Ident, Path};

/// One variant of the generated state enum.
pub struct StateVariant {
    pub ident: Ident,
    /// Scoped name, `Map.State`.
    pub name: String,
}

pub fn render_state_enum(
    state_enum: &Ident,
    runtime: &Path,
    states: &[StateVariant],
) -> TokenStream {
    let variants: Vec<_> = states.iter().map(|s| &s.ident).collect();
    let names = states.iter().map(|s| Literal::string(&s.name));
    let count = states.len();

    quote! {
        /// Every state of the machine, one variant per `Map_State`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[allow(non_camel_case_types)]
        pub enum #state_enum {
            #(#variants,)*
        }

        impl #state_enum {
            /// All states, indexed by id.
            pub const ALL: [#state_enum; #count] = [#(#state_enum::#variants,)*];

            pub fn name(self) -> &'static str {
                #runtime::StateId::name(self)
            }

            pub fn id(self) -> usize {
                #runtime::StateId::id(self)
            }
        }

        impl #runtime::StateId for #state_enum {
            fn name(self) -> &'static str {
                match self {
                    #(#state_enum::#variants => #names,)*
                }
            }

            fn id(self) -> usize {
                self as usize
            }

            fn from_id(id: usize) -> Option<Self> {
                Self::ALL.get(id).copied()
            }
        }
    }
}
