//! `#[derive(Injectable)]` 实现

use crate::attrs::InjectArgs;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Index, Result};

/// 一个字段的初始化方式
enum FieldInit {
    /// 第 n 个依赖
    Dependency(usize),
    /// 默认值
    Default,
}

pub fn derive_injectable_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "Injectable 只能用于结构体",
            ));
        }
    };

    let mut dependencies = Vec::new();
    let mut inits = Vec::new();

    for field in fields.iter() {
        let args = InjectArgs::from_attributes(&field.attrs)?;

        if args.default {
            inits.push(FieldInit::Default);
            continue;
        }

        let name = match (args.name, &field.ident) {
            (Some(name), _) => name,
            (None, Some(ident)) => ident.unraw().to_string(),
            (None, None) => {
                return Err(syn::Error::new_spanned(
                    field,
                    "元组结构体的字段需要 #[inject(name = \"...\")] 或 #[inject(default)]",
                ));
            }
        };

        inits.push(FieldInit::Dependency(dependencies.len()));
        dependencies.push(name);
    }

    let values = inits.iter().map(|init| match init {
        FieldInit::Dependency(index) => quote! { args.get(#index)? },
        FieldInit::Default => quote! { ::core::default::Default::default() },
    });

    let body = match fields {
        Fields::Named(named) => {
            let idents = named.named.iter().map(|field| &field.ident);
            quote! { Self { #(#idents: #values),* } }
        }
        Fields::Unnamed(unnamed) => {
            let indexes = (0..unnamed.unnamed.len()).map(Index::from);
            quote! { Self { #(#indexes: #values),* } }
        }
        Fields::Unit => quote! { Self },
    };

    let args_ident = if dependencies.is_empty() {
        quote! { _args }
    } else {
        quote! { args }
    };

    Ok(quote! {
        impl #impl_generics ::di_abstractions::Injectable for #struct_name #ty_generics #where_clause {
            fn dependencies() -> &'static [&'static str] {
                &[#(#dependencies),*]
            }

            fn construct(
                #args_ident: ::di_abstractions::BeanArgs,
            ) -> ::di_abstractions::DependencyResult<Self> {
                ::core::result::Result::Ok(#body)
            }
        }
    })
}
