//! Procedural macros for the Herald event emitter.
//!
//! - `#[derive(Event)]`: Implements `herald::Event` and `herald::EventTag` for
//!   your type, preserving generics and bounds. The routing key defaults to the
//!   fully qualified type path and can be set with `#[event(name = "...")]`.
//!
//! Usage:
//! ```rust,ignore
//! use herald::Event;
//!
//! // Routed as "my_crate::orders::OrderPlaced"
//! #[derive(Event)]
//! struct OrderPlaced { id: u64 }
//!
//! // Routed as "user.login"
//! #[derive(Event)]
//! #[event(name = "user.login")]
//! struct UserLogin;
//! ```
use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr, parse_macro_input};

#[proc_macro_derive(Event, attributes(event))]
pub fn derive_event(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_event(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_event(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let event_type = match event_name(input)? {
        Some(name) => quote! { #name },
        None => {
            let type_name = ident.to_string();
            quote! { ::core::concat!(::core::module_path!(), "::", #type_name) }
        }
    };

    Ok(quote! {
        impl #impl_generics ::herald::EventTag for #ident #ty_generics #where_clause {
            const EVENT_TYPE: ::herald::EventType = ::herald::EventType::from_static(#event_type);
        }

        impl #impl_generics ::herald::Event for #ident #ty_generics #where_clause {
            fn event_type(&self) -> ::herald::EventType {
                <Self as ::herald::EventTag>::EVENT_TYPE
            }
        }
    })
}

/// Reads `#[event(name = "...")]`, if present.
fn event_name(input: &DeriveInput) -> syn::Result<Option<LitStr>> {
    let mut name = None;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("event")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("event name must not be empty"));
                }
                name = Some(value);
                Ok(())
            } else {
                Err(meta.error("unsupported event attribute, expected `name`"))
            }
        })?;
    }
    Ok(name)
}
