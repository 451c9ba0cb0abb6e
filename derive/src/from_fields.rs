use std::collections::{HashMap, HashSet};

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    Data, DeriveInput, Error, ExprClosure, Field, Fields, GenericArgument, Ident, LitInt, Pat,
    PathArguments, Result, Token, Type,
    parse::{Parse, ParseStream},
    spanned::Spanned,
};

pub(crate) fn expand_from_fields(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`FromFields` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new(
            input.span(),
            "`FromFields` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .map(Result::transpose)
        .flatten() // Skip fields without an attribute.
        .collect::<Result<Vec<_>>>()?;

    let mut field_methods: HashMap<Kind, Vec<(u8, TokenStream2)>> = HashMap::new();
    let mut indices = HashSet::new();
    let mut trailing_method: Option<TokenStream2> = None;

    for field in fields {
        let assignment = field.assignment();

        match &field.identifier {
            FieldIdentifier::Index(index) => {
                let number = index.base10_parse::<u8>()?;

                if !indices.insert(number) {
                    Err(Error::new(index.span(), "Field indices must be unique."))?
                }

                field_methods
                    .entry(field.kind)
                    .or_default()
                    .push((number, assignment));
            }
            FieldIdentifier::Trailing => {
                let existing = trailing_method.replace(assignment);

                if existing.is_some() {
                    Err(Error::new(
                        field.span,
                        "Only one field may receive trailing bits.",
                    ))?;
                }
            }
        }
    }

    let field_methods = field_methods.into_iter().map(|(kind, cases)| {
        let cases = cases
            .into_iter()
            .map(|(number, assignment)| quote! { #number => { #assignment } });

        let method = format_ident!("add_{}", kind.name());
        let primitive = kind.primitive();

        quote! {
            fn #method(&mut self, field: u8, value: #primitive) {
                match field {
                    #(#cases)*
                    _ => {}
                };
            }
        }
    });

    let trailing_method = trailing_method.map(|assignment| {
        quote! {
            fn add_trailing_bits(&mut self, value: usize) {
                #assignment;
            }
        }
    });

    let name = &input.ident;

    let expanded = quote! {
        impl FromFields for #name {
            #(#field_methods)*
            #trailing_method
        }
    };

    Ok(expanded.into())
}

/// The kind of layout field a struct field receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Unsigned,
    Signed,
    Flag,
    Text,
    Trailing,
}

impl Kind {
    fn name(self) -> &'static str {
        match self {
            Kind::Unsigned => "unsigned",
            Kind::Signed => "signed",
            Kind::Flag => "flag",
            Kind::Text => "text",
            Kind::Trailing => "trailing_bits",
        }
    }

    fn primitive(self) -> TokenStream2 {
        match self {
            Kind::Unsigned => quote! { u64 },
            Kind::Signed => quote! { i64 },
            Kind::Flag => quote! { bool },
            Kind::Text => quote! { &str },
            Kind::Trailing => quote! { usize },
        }
    }

    /// Infer the kind from the type a value is stored as.
    fn of_target(ty: &Type) -> Self {
        let ident = match ty {
            Type::Path(path) => path.path.segments.last().map(|s| s.ident.to_string()),
            _ => None,
        };

        match ident.as_deref() {
            Some("u8" | "u16" | "u32" | "u64" | "u128" | "usize") => Kind::Unsigned,
            Some("i8" | "i16" | "i32" | "i64" | "i128" | "isize") => Kind::Signed,
            Some("bool") => Kind::Flag,
            _ => Kind::Text,
        }
    }

    /// Determine the kind from a handler's typed value parameter.
    fn of_parameter(ty: &Type) -> Result<Self> {
        let kind = match ty {
            Type::Path(path) if path.path.is_ident("u64") => Kind::Unsigned,
            Type::Path(path) if path.path.is_ident("i64") => Kind::Signed,
            Type::Path(path) if path.path.is_ident("bool") => Kind::Flag,
            Type::Reference(reference) if matches!(&*reference.elem, Type::Path(p) if p.path.is_ident("str")) => {
                Kind::Text
            }
            _ => Err(Error::new_spanned(
                ty,
                "Handler closure's second parameter must be one of `u64`, `i64`, `bool` or `&str`.",
            ))?,
        };

        Ok(kind)
    }
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    ty: Type,
    identifier: FieldIdentifier,
    kind: Kind,
    target: Target,
    span: proc_macro2::Span,
}

#[derive(Debug)]
enum FieldIdentifier {
    Index(LitInt),
    Trailing,
}

#[derive(Debug)]
enum Target {
    /// Assign to an `Option<T>` field.
    Option(Type),
    /// Assign to a field of the received type.
    Plain(Type),
    /// Pass to an accumulator closure.
    Handler(ExprClosure),
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let name = field.ident.clone().unwrap();

        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("field")) else {
            return Ok(None);
        };

        let span = attr.span();

        let FieldAttribute {
            identifier,
            handler,
        } = attr.meta.require_list()?.parse_args()?;

        let (kind, target) = if let Some(handler) = handler {
            let Some(parameter) = handler.inputs.iter().nth(1) else {
                Err(Error::new_spanned(
                    &handler,
                    "Handler closure must have two parameters.",
                ))?
            };

            let Pat::Type(pat_type) = parameter else {
                Err(Error::new_spanned(
                    parameter,
                    "Handler closure's second parameter must be annotated with the expected primitive type.",
                ))?
            };

            let kind = match identifier {
                FieldIdentifier::Index(_) => Kind::of_parameter(&pat_type.ty)?,
                FieldIdentifier::Trailing => Kind::Trailing,
            };

            (kind, Target::Handler(handler))
        } else {
            let inner = option_argument(&field.ty)?;

            let kind = match identifier {
                FieldIdentifier::Index(_) => Kind::of_target(inner.as_ref().unwrap_or(&field.ty)),
                FieldIdentifier::Trailing => Kind::Trailing,
            };

            let target = match inner {
                Some(inner) => Target::Option(inner),
                None => Target::Plain(field.ty.clone()),
            };

            (kind, target)
        };

        Ok(Some(Self {
            name,
            ty: field.ty.clone(),
            identifier,
            kind,
            target,
            span,
        }))
    }

    /// Build the statement storing a received `value` into this field.
    fn assignment(&self) -> TokenStream2 {
        let name = &self.name;
        let primitive = self.kind.primitive();

        let (inner, wrap) = match &self.target {
            Target::Handler(handler) => {
                let field_type = &self.ty;
                let body = &handler.body;
                let acc = handler.inputs.iter().nth(0).unwrap();
                let val = handler.inputs.iter().nth(1).unwrap();

                return quote! {
                    (|#acc: &mut #field_type, #val| { #body })(&mut self.#name, value)
                };
            }
            Target::Option(inner) => (inner, quote! { Some(value) }),
            Target::Plain(inner) => (inner, quote! { value }),
        };

        match self.kind {
            Kind::Unsigned | Kind::Signed | Kind::Trailing => quote! {
                if let Ok(value) = <#inner as ::core::convert::TryFrom<#primitive>>::try_from(value) {
                    self.#name = #wrap;
                }
            },
            Kind::Flag => quote! {
                self.#name = #wrap;
            },
            Kind::Text => quote! {
                let value = <#inner as ::core::convert::From<&str>>::from(value);
                self.#name = #wrap;
            },
        }
    }
}

/// Return `T` for a field of type `Option<T>`.
fn option_argument(ty: &Type) -> Result<Option<Type>> {
    let Type::Path(path) = ty else {
        return Ok(None);
    };

    let Some(segment) = path.path.segments.first() else {
        Err(Error::new_spanned(
            &path.path.segments,
            "Field must have a type annotation.",
        ))?
    };

    if segment.ident != "Option" {
        return Ok(None);
    }

    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        Err(Error::new_spanned(
            &segment.arguments,
            "Field of type `Option<T>` must have a generic parameter.",
        ))?
    };

    let Some(argument) = arguments.args.first() else {
        Err(Error::new_spanned(
            &arguments.args,
            "Field of type `Option<T>` must have a generic parameter.",
        ))?
    };

    let GenericArgument::Type(inner_type) = argument else {
        Err(Error::new_spanned(
            argument,
            "Generic argument of a field of type `Option<T>` must be a type.",
        ))?
    };

    Ok(Some(inner_type.clone()))
}

#[derive(Debug)]
struct FieldAttribute {
    identifier: FieldIdentifier,
    handler: Option<ExprClosure>,
}

impl Parse for FieldAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let identifier = if let Ok(ident) = input.parse::<Ident>() {
            if ident == "trailing" {
                FieldIdentifier::Trailing
            } else {
                Err(Error::new_spanned(
                    ident,
                    "Field identifier must be an integer literal or `trailing`.",
                ))?
            }
        } else {
            FieldIdentifier::Index(input.parse::<LitInt>()?)
        };

        let handler = if !input.is_empty() {
            input.parse::<Token![,]>()?;
            Some(input.parse::<ExprClosure>()?)
        } else {
            None
        };

        Ok(Self {
            identifier,
            handler,
        })
    }
}
