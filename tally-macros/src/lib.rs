//! Procedural macros for tally

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Derive macro for the `Action` trait
///
/// Generates a `name()` method that returns the variant name as a static string,
/// so actions can be logged without formatting their payloads.
///
/// # Example
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// enum CounterAction {
///     Increment,
///     FactResponse(Result<String, FactFetchFailed>),
/// }
///
/// assert_eq!(CounterAction::Increment.name(), "Increment");
/// ```
#[proc_macro_derive(Action)]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => {
            return syn::Error::new_spanned(&input, "Action can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    let name_arms = variants.iter().map(|v| {
        let variant_name = &v.ident;
        let variant_str = variant_name.to_string();

        match &v.fields {
            Fields::Unit => quote! {
                #name::#variant_name => #variant_str
            },
            Fields::Unnamed(_) => quote! {
                #name::#variant_name(..) => #variant_str
            },
            Fields::Named(_) => quote! {
                #name::#variant_name { .. } => #variant_str
            },
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::tally_core::Action for #name #ty_generics #where_clause {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms),*
                }
            }
        }
    };

    expanded.into()
}
