use quote::ToTokens;
use syn::{
    parse::{Parse, ParseStream},
    Attribute, Token,
};

/// `keyword = value` argument
pub(crate) struct Assigned<K, V> {
    pub(crate) keyword: K,
    pub(crate) value: V,
}

impl<K: Parse, V: Parse> Parse for Assigned<K, V> {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let keyword = input.parse()?;
        input.parse::<Token![=]>()?;
        let value = input.parse()?;

        Ok(Self { keyword, value })
    }
}

/// Stores the argument, failing if the keyword was already given
pub(crate) fn assign_once<K, V>(out: &mut Option<Assigned<K, V>>, arg: Assigned<K, V>) -> syn::Result<()>
where
    K: ToTokens,
{
    if out.is_some() {
        let keyword = arg.keyword.to_token_stream();
        return Err(syn::Error::new_spanned(&keyword, format!("`{keyword}` specified more than once")));
    }
    *out = Some(arg);
    Ok(())
}

/// Arguments spread over several attributes of the same item
pub(crate) trait Merge: Sized {
    fn merge(&mut self, other: Self) -> syn::Result<()>;
}

/// Parses and merges the arguments of all attributes with the ident, `None` if there are no such attributes
pub(crate) fn parse_attrs<T>(ident: &str, attrs: &[Attribute]) -> Option<syn::Result<T>>
where
    T: Merge + Parse,
{
    let merge_all = || -> syn::Result<Option<T>> {
        let mut merged: Option<T> = None;
        for attr in attrs.iter().filter(|attr| attr.path().is_ident(ident)) {
            let args = attr.parse_args::<T>()?;
            match &mut merged {
                Some(merged) => merged.merge(args)?,
                None => merged = Some(args),
            }
        }
        Ok(merged)
    };

    merge_all().transpose()
}
