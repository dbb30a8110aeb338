use proc_macro::TokenStream;
use quote::{quote, ToTokens};
use std::env::var_os;
use syn::parse::Parse;

mod attr_parsing;
mod injectable;

/// Derives `fabric::Injectable` for a struct with named fields.
///
/// Fields marked with `#[fabric(tag = "...")]` are produced by the container's tag processors,
/// e.g. `#[fabric(tag = "inject")]` or `#[fabric(tag = "inject:cache")]`.
/// Their type must be `Arc<T>` or `Option<Arc<T>>`.
/// Other fields are filled with [`Default::default`].
#[proc_macro_derive(Injectable, attributes(fabric))]
pub fn derive_injectable(item: TokenStream) -> TokenStream {
    expand_with(item, injectable::expand)
}

fn expand_with<F, I, K>(input: TokenStream, f: F) -> TokenStream
where
    F: FnOnce(I) -> syn::Result<K>,
    I: Parse,
    K: ToTokens,
{
    expand(syn::parse(input).and_then(f))
}

fn expand<T>(result: syn::Result<T>) -> TokenStream
where
    T: ToTokens,
{
    match result {
        Ok(tokens) => {
            let tokens = (quote! { #tokens }).into();
            if var_os("FABRIC_MACROS_DEBUG").is_some() {
                eprintln!("{tokens}");
            }
            tokens
        }
        Err(err) => err.into_compile_error().into(),
    }
}
