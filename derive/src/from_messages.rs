use std::collections::BTreeMap;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Error, Field, Fields, Ident, LitInt, Result, Type};

pub(crate) fn expand_from_messages(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new_spanned(
            input,
            "`FromMessages` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new_spanned(
            input,
            "`FromMessages` may only be derived on structs with named fields.",
        ))?
    };

    // Keyed by message type, so generated arms are sorted.
    let mut collectors = BTreeMap::new();

    for field in &fields.named {
        let Some(collector) = Collector::parse(field)? else {
            continue;
        };

        if let Some(previous) = collectors.insert(collector.message_type, collector) {
            Err(Error::new_spanned(
                &previous.name,
                "Each message type may be collected by only one field.",
            ))?
        }
    }

    let arms = collectors.values().map(|collector| {
        let message_type = collector.message_type;
        let receiver = collector.receiver();
        quote! { #message_type => #receiver, }
    });

    let name = &input.ident;

    let expanded = quote! {
        impl FromMessages for #name {
            fn add_message(&mut self, message_type: u8) -> Option<&mut dyn FromFields> {
                match message_type {
                    #(#arms)*
                    _ => None,
                }
            }
        }
    };

    Ok(expanded.into())
}

/// How a struct field collects messages of its type.
#[derive(Debug, Clone, Copy)]
enum Collection {
    /// `Option<T>`: the latest message replaces any earlier one.
    Latest,
    /// `Vec<T>`: every message is appended.
    Every,
}

#[derive(Debug)]
struct Collector {
    name: Ident,
    message_type: u8,
    collection: Collection,
}

impl Collector {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("message")) else {
            return Ok(None);
        };

        let name = field.ident.clone().unwrap();

        let literal = attr.parse_args::<LitInt>()?;
        let message_type = literal.base10_parse::<u8>()?;

        if message_type > 63 {
            Err(Error::new_spanned(
                &literal,
                "Message types are 6-bit values (0 to 63).",
            ))?
        }

        let collection = match &field.ty {
            Type::Path(path) => match path.path.segments.last() {
                Some(segment) if segment.ident == "Option" => Some(Collection::Latest),
                Some(segment) if segment.ident == "Vec" => Some(Collection::Every),
                _ => None,
            },
            _ => None,
        };

        let Some(collection) = collection else {
            Err(Error::new_spanned(
                &field.ty,
                "Field must have an `Option<T>` or `Vec<T>` type.",
            ))?
        };

        Ok(Some(Self {
            name,
            message_type,
            collection,
        }))
    }

    /// Build the expression handing out a fresh receiver.
    fn receiver(&self) -> TokenStream2 {
        let name = &self.name;

        match self.collection {
            Collection::Latest => quote! {
                Some(self.#name.insert(Default::default()))
            },
            Collection::Every => quote! {{
                self.#name.push(Default::default());
                self.#name.last_mut().map(|m| m as &mut dyn FromFields)
            }},
        }
    }
}
