use syn::{
    parse::{Parse, ParseStream},
    Attribute, LitStr, Token,
};

use crate::attr_parsing::{assign_once, parse_attrs, Assigned, Merge};

pub(crate) mod kw {
    syn::custom_keyword!(tag);
}

/// Arguments of `#[fabric(...)]` on a field
pub(crate) struct FieldArgs {
    pub(super) tag: Option<Assigned<kw::tag, LitStr>>,
}

impl Parse for FieldArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut tag = None;

        while !input.is_empty() {
            let lh = input.lookahead1();
            if lh.peek(kw::tag) {
                assign_once(&mut tag, input.parse()?)?;
            } else {
                return Err(lh.error());
            }

            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(Self { tag })
    }
}

impl Merge for FieldArgs {
    fn merge(&mut self, other: Self) -> syn::Result<()> {
        if let Some(tag) = other.tag {
            assign_once(&mut self.tag, tag)?;
        }
        Ok(())
    }
}

pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> Option<syn::Result<FieldArgs>> {
    parse_attrs("fabric", attrs)
}
