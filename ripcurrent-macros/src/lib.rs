//! Procedural macros for `ripcurrent`.
//!
//! - `#[derive(Payload)]` names a message type for diagnostics.
//! - `#[derive(Node)]` with `#[node(input(...), output(...))]` declares a
//!   node's contracts and generates per-type dispatch to its `Reacts` impls.
//! - `contract![...]` spells a contract as a type.
//!
//! Contracts are canonicalized at expansion time: payload types are sorted by
//! name and duplicates collapse, so set-equal contracts are the same type and
//! mismatched connections fail to compile. Sorting only sees the path as
//! written; a payload reached through a `use ... as` alias sorts under the
//! alias, and such contracts need `Fragment::connect`, which compares sets at
//! the type level.

use darling::FromDeriveInput;
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, DeriveInput, Token};

mod contract;
mod node_meta;

use contract::{canonicalize, tuple};
use node_meta::{NodeArgs, PayloadArgs};

#[proc_macro_derive(Payload, attributes(payload))]
pub fn derive_payload(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let args = match PayloadArgs::from_derive_input(&input) {
        Ok(args) => args,
        Err(e) => return e.write_errors().into(),
    };

    let ident = &args.ident;
    let name = args.display_name();
    let (impl_generics, ty_generics, where_clause) = args.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::ripcurrent::Payload for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
        }
    };

    TokenStream::from(expanded)
}

#[proc_macro_derive(Node, attributes(node))]
pub fn derive_node(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let args = match NodeArgs::from_derive_input(&input) {
        Ok(args) => args,
        Err(e) => return e.write_errors().into(),
    };

    let inputs = match canonicalize(&args.input) {
        Ok(paths) => paths,
        Err(e) => return e.to_compile_error().into(),
    };
    let outputs = match canonicalize(&args.output) {
        Ok(paths) => paths,
        Err(e) => return e.to_compile_error().into(),
    };

    let ident = &args.ident;
    let name = args.display_name();
    let input_contract = tuple(&inputs);
    let output_contract = tuple(&outputs);
    let (impl_generics, ty_generics, where_clause) = args.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::ripcurrent::Node for #ident #ty_generics #where_clause {
            type Input = #input_contract;
            type Output = #output_contract;

            const NAME: &'static str = #name;

            #[allow(unused_variables)]
            fn dispatch(
                &mut self,
                message: ::ripcurrent::Message,
                out: &mut ::ripcurrent::Emitter<'_, Self::Output>,
            ) -> ::core::result::Result<::ripcurrent::NodeResult, ::ripcurrent::Message> {
                #(
                    let message = match message.downcast::<#inputs>() {
                        ::core::result::Result::Ok(value) => {
                            return ::core::result::Result::Ok(
                                <Self as ::ripcurrent::Reacts<#inputs>>::react(self, value, out),
                            );
                        }
                        ::core::result::Result::Err(message) => message,
                    };
                )*
                ::core::result::Result::Err(message)
            }
        }
    };

    TokenStream::from(expanded)
}

/// Spells a contract as its canonical tuple type:
/// `contract![Text, Integer]` expands to `(Integer, Text,)`.
#[proc_macro]
pub fn contract(input: TokenStream) -> TokenStream {
    let paths = parse_macro_input!(input with Punctuated::<syn::Path, Token![,]>::parse_terminated);
    let paths: Vec<syn::Path> = paths.into_iter().collect();

    match canonicalize(&paths) {
        Ok(canonical) => TokenStream::from(tuple(&canonical)),
        Err(e) => e.to_compile_error().into(),
    }
}
