mod attr;

use crate::{attr_parsing::Assigned, injectable::attr::parse_field_attrs};

use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::{ext::IdentExt as _, spanned::Spanned as _, Data, DeriveInput, Error, Field, Fields};

struct Expanded {
    descriptor: Option<TokenStream>,
    initializer: TokenStream,
}

fn expand_field(field: &Field) -> syn::Result<Expanded> {
    let Some(ident) = &field.ident else {
        return Err(Error::new_spanned(field, "field must be named"));
    };
    let name = ident.unraw().to_string();
    let ty = &field.ty;
    let span = field.span();

    let Some(args) = parse_field_attrs(&field.attrs) else {
        return Ok(Expanded {
            descriptor: None,
            initializer: quote_spanned! { span => #ident: ::core::default::Default::default() },
        });
    };
    let Some(Assigned { value: tag, .. }) = args?.tag else {
        return Err(Error::new_spanned(field, "missing `tag` argument"));
    };

    Ok(Expanded {
        descriptor: Some(quote_spanned! { span => ::fabric::Field::new::<#ty>(#name, #tag) }),
        initializer: quote_spanned! { span => #ident: __injected.take::<#ty>(#name)? },
    })
}

pub(crate) fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(&input.ident, "`Injectable` can only be derived for structs"));
    };
    if let Fields::Unnamed(fields) = &data.fields {
        return Err(Error::new_spanned(fields, "tuple structs are not supported, use named fields"));
    }

    let expanded = data.fields.iter().map(expand_field).collect::<syn::Result<Vec<_>>>()?;
    let descriptors = expanded.iter().filter_map(|field| field.descriptor.as_ref());
    let initializers = expanded.iter().map(|field| &field.initializer);

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::fabric::Injectable for #ident #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<::fabric::Field> {
                ::std::vec![#( #descriptors ),*]
            }

            #[allow(unused_variables)]
            fn inject(__injected: &mut ::fabric::Injected) -> ::core::result::Result<Self, ::fabric::InstantiateErrorKind> {
                ::core::result::Result::Ok(Self {
                    #( #initializers, )*
                })
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::expand;

    use syn::{parse_quote, DeriveInput};

    fn expand_err(input: DeriveInput) -> String {
        expand(input).err().unwrap().to_string()
    }

    fn expand_compact(input: DeriveInput) -> String {
        expand(input).unwrap().to_string().replace(' ', "")
    }

    #[test]
    fn test_expand() {
        let tokens = expand_compact(parse_quote! {
            struct Service {
                #[fabric(tag = "inject")]
                logger: Arc<Logger>,
                #[fabric(tag = "inject:cache")]
                r#cache: Option<Arc<dyn Database>>,
                requests: u64,
            }
        });

        assert!(tokens.contains("impl::fabric::InjectableforService"));
        assert!(tokens.contains(r#"::fabric::Field::new::<Arc<Logger>>("logger","inject")"#));
        assert!(tokens.contains(r#"::fabric::Field::new::<Option<Arc<dynDatabase>>>("cache","inject:cache")"#));
        assert!(tokens.contains(r#"r#cache:__injected.take::<Option<Arc<dynDatabase>>>("cache")?"#));
        assert!(tokens.contains("requests:::core::default::Default::default()"));
    }

    #[test]
    fn test_unit_struct() {
        let tokens = expand_compact(parse_quote! { struct Marker; });

        assert!(tokens.contains("fields()->::std::vec::Vec<::fabric::Field>{::std::vec![]}"));
        assert!(tokens.contains("Ok(Self{})"));
    }

    #[test]
    fn test_errors() {
        assert!(expand_err(parse_quote! { enum Service { A } }).contains("only be derived for structs"));
        assert!(expand_err(parse_quote! { struct Service(#[fabric(tag = "inject")] Arc<Logger>); }).contains("tuple structs"));
        assert!(expand_err(parse_quote! {
            struct Service {
                #[fabric()]
                logger: Arc<Logger>,
            }
        })
        .contains("missing `tag`"));
        assert!(expand_err(parse_quote! {
            struct Service {
                #[fabric(tag = "inject", tag = "inject:cache")]
                logger: Arc<Logger>,
            }
        })
        .contains("specified more than once"));
        assert!(expand_err(parse_quote! {
            struct Service {
                #[fabric(tag = "inject")]
                #[fabric(tag = "inject:cache")]
                logger: Arc<Logger>,
            }
        })
        .contains("specified more than once"));
    }
}
