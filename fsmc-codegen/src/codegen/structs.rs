use proc_macro2::TokenStream;
use quote::quote;
use syn::{Ident, Path};

pub fn render_context_struct(
    context: &Ident,
    owner: &Ident,
    state_enum: &Ident,
    runtime: &Path,
) -> TokenStream {
    let doc = format!("Drives the state machine of a `{owner}`.");
    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone)]
        pub struct #context {
            fsm: #runtime::FsmContext<#state_enum>,
        }
    }
}

/// A public transition method, as forwarded by the shared wrapper.
pub struct Forward {
    pub method: Ident,
    pub params: Vec<TokenStream>,
    pub args: Vec<Ident>,
}

pub fn render_shared_struct(
    shared: &Ident,
    context: &Ident,
    owner: &Ident,
    runtime: &Path,
    forwards: &[Forward],
) -> TokenStream {
    let methods = forwards.iter().map(|f| {
        let method = &f.method;
        let params = &f.params;
        let args = &f.args;
        quote! {
            pub fn #method(&self, ctxt: &mut #owner #(, #params)*) -> Result<(), #runtime::TransitionError> {
                self.lock().#method(ctxt #(, #args)*)
            }
        }
    });

    let doc = format!("A `{context}` usable from several threads.");
    quote! {
        #[doc = #doc]
        #[derive(Debug)]
        pub struct #shared {
            inner: ::std::sync::Mutex<#context>,
        }

        #[allow(non_snake_case)]
        impl #shared {
            pub fn new(context: #context) -> Self {
                Self {
                    inner: ::std::sync::Mutex::new(context),
                }
            }

            /// Locks the context. A panic inside a transition does not
            /// poison it for later callers.
            pub fn lock(&self) -> ::std::sync::MutexGuard<'_, #context> {
                self.inner
                    .lock()
                    .unwrap_or_else(::std::sync::PoisonError::into_inner)
            }

            pub fn into_inner(self) -> #context {
                self.inner
                    .into_inner()
                    .unwrap_or_else(::std::sync::PoisonError::into_inner)
            }

            #(#methods)*
        }
    }
}
