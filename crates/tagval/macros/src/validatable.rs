use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Visibility, parse_macro_input, parse_quote};

use crate::support::{attrs, diag};

/// Attribute keys that are not tag keys.
const RESERVED: &[&str] = &["rename"];

/// Flags understood on fields.
const FLAGS: &[&str] = &["skip"];

const NAMED_FIELDS_REQUIRED: &str = "Validatable derive requires a struct with named fields";

pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(input) {
        Ok(ts) => ts.into(),
        Err(e) => diag::to_compile_error(e),
    }
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unnamed(unnamed) => {
                return Err(diag::error_spanned(unnamed, NAMED_FIELDS_REQUIRED));
            }
            Fields::Unit => {
                return Err(syn::Error::new(struct_name.span(), NAMED_FIELDS_REQUIRED));
            }
        },
        _ => {
            return Err(syn::Error::new(
                struct_name.span(),
                "Validatable derive can only be used on structs",
            ));
        }
    };

    // Field types are bounded only on generic structs; a bound on a
    // self-referential field type of a concrete struct would not resolve.
    let bound_fields = !input.generics.params.is_empty();
    let mut generics = input.generics.clone();
    let where_clause = generics.make_where_clause();
    where_clause.predicates.push(parse_quote!(Self: 'static));

    let mut descriptors = Vec::new();
    let mut values = Vec::new();

    for field in fields {
        let args = attrs::parse_attrs(&field.attrs, "tag")?;
        if let Some(flag) = args.unknown_flags(FLAGS).next() {
            return Err(diag::error_spanned(
                flag,
                format!("unknown flag `{flag}`; expected `skip` or `key = \"...\"`"),
            ));
        }
        if args.has_flag("skip") {
            continue;
        }

        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let name = args
            .get_string("rename")
            .unwrap_or_else(|| ident.unraw().to_string());
        let exported = matches!(field.vis, Visibility::Public(_));
        let tags = args.string_pairs(RESERVED)?.into_iter().map(|(key, raw)| {
            let key = key.unraw().to_string();
            quote!((#key, #raw))
        });

        descriptors.push(quote! {
            ::nebula_tagval::foundation::FieldDescriptor::new(#name, #exported, &[#(#tags),*])
        });
        values.push(quote! {
            &self.#ident as &dyn ::nebula_tagval::foundation::Validatable
        });

        if bound_fields {
            let ty = &field.ty;
            where_clause
                .predicates
                .push(parse_quote!(#ty: ::nebula_tagval::foundation::Validatable));
        }
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let type_name = struct_name.unraw().to_string();

    let expanded = quote! {
        impl #impl_generics ::nebula_tagval::foundation::Validatable for #struct_name #ty_generics #where_clause {
            fn as_value(&self) -> ::nebula_tagval::foundation::Value<'_> {
                const FIELDS: &[::nebula_tagval::foundation::FieldDescriptor] = &[
                    #(#descriptors),*
                ];

                ::nebula_tagval::foundation::Value::Struct(
                    ::nebula_tagval::foundation::StructValue::new::<Self>(
                        #type_name,
                        FIELDS,
                        ::std::vec![#(#values),*],
                    ),
                )
            }
        }
    };

    Ok(expanded)
}
