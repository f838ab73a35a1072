//! Procedural macros for the profiled interception layer.
//!
//! - `#[derive(Profiled)]`: marks a component type as managed. Implements
//!   `profiled::Managed`, producing the `ComponentType` descriptor with the
//!   declared contract list and the wrap function that builds the matching
//!   proxy. Contracts are declared with the helper attribute
//!   `#[profiled(contracts(TraitA, TraitB))]`; without it the type wraps
//!   through the concrete-mirroring strategy.
//! - `#[intercept]` on an impl block: generates the interception code. On a
//!   trait impl it re-implements the trait for `ContractProxy<T>`; on an
//!   inherent impl it synthesizes a `{Type}Proxy` struct (backed by
//!   `ConcreteProxy<T>`) mirroring the methods. Either
//!   way each generated method formats the argument binding, routes the call
//!   through the proxy's recorder, and delegates to the original method.
//!
//! Usage:
//! ```rust,ignore
//! use profiled::{Profiled, intercept};
//!
//! #[derive(Profiled)]
//! #[profiled(contracts(Pricing))]
//! struct Exchange { rate: f64 }
//!
//! #[intercept]
//! impl Pricing for Exchange {
//!     fn quote(&self, symbol: &str, amount: i32) -> f64 {
//!         self.rate * amount as f64
//!     }
//! }
//! ```
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Data, DeriveInput, FnArg, ImplItem, ImplItemFn, ItemImpl, Pat, Path, ReturnType, Token, Type,
    parse_macro_input, spanned::Spanned,
};

#[proc_macro_derive(Profiled, attributes(profiled))]
pub fn derive_profiled(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_derive(&input) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_derive(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    if let Data::Union(_) = input.data {
        return Err(syn::Error::new_spanned(
            input,
            "unions cannot be profiled components",
        ));
    }
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "profiled components cannot be generic",
        ));
    }

    let mut contracts: Vec<Path> = Vec::new();
    for attr in &input.attrs {
        if !attr.path().is_ident("profiled") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("contracts") {
                let content;
                syn::parenthesized!(content in meta.input);
                let paths = content.parse_terminated(Path::parse_mod_style, Token![,])?;
                contracts.extend(paths);
                Ok(())
            } else {
                Err(meta.error("expected `contracts(...)`"))
            }
        })?;
    }

    let ident = &input.ident;
    let name = ident.to_string();
    let contract_names = contracts.iter().map(|path| {
        path.segments
            .last()
            .map(|segment| segment.ident.to_string())
            .unwrap_or_default()
    });

    // Concrete components are wrapped by the `{Type}Proxy` struct that the
    // inherent #[intercept] impl generates alongside the target type.
    let build_proxy = if contracts.is_empty() {
        let proxy_ident = format_ident!("{ident}Proxy");
        quote! { #proxy_ident::__wrap(*target, recorder) }
    } else {
        quote! { ::profiled::ContractProxy::new(*target, recorder) }
    };

    Ok(quote! {
        impl ::profiled::Managed for #ident {
            fn managed_type() -> ::profiled::ComponentType {
                ::profiled::ComponentType::managed(
                    #name,
                    &[#(#contract_names),*],
                    |target, recorder| {
                        let target = target
                            .downcast::<#ident>()
                            .map_err(|_| ::profiled::Error::TargetTypeMismatch(#name))?;
                        Ok(::std::boxed::Box::new(#build_proxy)
                            as ::profiled::BoxedComponent)
                    },
                )
            }
        }
    })
}

#[proc_macro_attribute]
pub fn intercept(args: TokenStream, input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemImpl);
    if !args.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[intercept] takes no arguments on impl blocks",
        )
        .to_compile_error()
        .into();
    }
    match expand_impl(&item) {
        Ok(generated) => quote! { #item #generated }.into(),
        Err(err) => {
            // Keep the original impl so only the macro error surfaces.
            let err = err.to_compile_error();
            quote! { #item #err }.into()
        }
    }
}

fn expand_impl(item: &ItemImpl) -> syn::Result<proc_macro2::TokenStream> {
    let self_ty = &*item.self_ty;
    let (impl_generics, _, where_clause) = item.generics.split_for_impl();
    let trait_path = item.trait_.as_ref().map(|(_, path, _)| path);

    let mut methods = Vec::new();
    for impl_item in &item.items {
        let ImplItem::Fn(func) = impl_item else {
            return Err(syn::Error::new_spanned(
                impl_item,
                "#[intercept] impl blocks may only contain methods",
            ));
        };
        methods.push(expand_method(func, self_ty, trait_path)?);
    }

    match trait_path {
        // Contract delegation: re-implement the trait for the shared proxy
        // type; the trait or the target is local, so coherence holds.
        Some(path) => Ok(quote! {
            impl #impl_generics #path for ::profiled::ContractProxy<#self_ty> #where_clause {
                #(#methods)*
            }
        }),
        // Concrete mirroring: inherent impls must live on a local type, so a
        // `{Type}Proxy` struct is synthesized next to the impl block. The
        // derive constructs it through the `__wrap` hook by that name.
        None => {
            if !item.generics.params.is_empty() {
                return Err(syn::Error::new_spanned(
                    &item.generics,
                    "inherent #[intercept] impls cannot be generic",
                ));
            }
            let Type::Path(type_path) = self_ty else {
                return Err(syn::Error::new_spanned(
                    self_ty,
                    "#[intercept] requires a named target type",
                ));
            };
            let Some(target_ident) = type_path.path.segments.last().map(|s| &s.ident) else {
                return Err(syn::Error::new_spanned(
                    self_ty,
                    "#[intercept] requires a named target type",
                ));
            };
            let proxy_ident = format_ident!("{target_ident}Proxy");
            let doc = format!("Generated interception proxy around [`{target_ident}`].");
            Ok(quote! {
                #[doc = #doc]
                pub struct #proxy_ident {
                    inner: ::profiled::ConcreteProxy<#self_ty>,
                }

                impl #proxy_ident {
                    #[doc(hidden)]
                    pub fn __wrap(
                        target: #self_ty,
                        recorder: ::profiled::CallRecorder,
                    ) -> Self {
                        Self {
                            inner: ::profiled::ConcreteProxy::new(target, recorder),
                        }
                    }

                    #(#methods)*
                }
            })
        }
    }
}

fn expand_method(
    func: &ImplItemFn,
    self_ty: &Type,
    trait_path: Option<&Path>,
) -> syn::Result<proc_macro2::TokenStream> {
    let sig = &func.sig;
    if sig.asyncness.is_some() {
        return Err(syn::Error::new(
            sig.span(),
            "async methods cannot be intercepted",
        ));
    }
    if sig.constness.is_some() || sig.unsafety.is_some() || sig.abi.is_some() {
        return Err(syn::Error::new(
            sig.span(),
            "const, unsafe and extern methods cannot be intercepted",
        ));
    }
    let Some(FnArg::Receiver(receiver)) = sig.inputs.first() else {
        return Err(syn::Error::new(
            sig.span(),
            "associated functions without a receiver cannot be intercepted",
        ));
    };
    if receiver.reference.is_none() {
        return Err(syn::Error::new(
            receiver.span(),
            "intercepted methods must take &self or &mut self",
        ));
    }
    let is_mut = receiver.mutability.is_some();

    // One local per parameter. Identifier patterns keep their name; anything
    // else (tuples, wildcards) falls back to a positional `argN`, both as the
    // local and as the name in the logged binding.
    let mut locals = Vec::new();
    let mut labels = Vec::new();
    for (index, arg) in sig.inputs.iter().skip(1).enumerate() {
        let FnArg::Typed(pat_ty) = arg else {
            return Err(syn::Error::new(arg.span(), "unexpected receiver position"));
        };
        let local = match &*pat_ty.pat {
            Pat::Ident(pat) => pat.ident.clone(),
            _ => format_ident!("arg{index}"),
        };
        labels.push(local.to_string());
        locals.push(local);
    }

    let mut proxy_sig = sig.clone();
    for (arg, local) in proxy_sig.inputs.iter_mut().skip(1).zip(&locals) {
        if let FnArg::Typed(pat_ty) = arg {
            pat_ty.pat = Box::new(Pat::Ident(syn::PatIdent {
                attrs: Vec::new(),
                by_ref: None,
                mutability: None,
                ident: local.clone(),
                subpat: None,
            }));
            pat_ty.attrs.clear();
        }
    }

    let binding = if locals.is_empty() {
        quote! { ::std::string::String::new() }
    } else {
        let template = labels
            .iter()
            .map(|label| format!("{label} = {{}}"))
            .collect::<Vec<_>>()
            .join(", ");
        quote! { ::std::format!(#template, #(#locals),*) }
    };

    let method_ident = &sig.ident;
    let delegate = match trait_path {
        Some(path) => quote! { <#self_ty as #path>::#method_ident(__target #(, #locals)*) },
        None => quote! { <#self_ty>::#method_ident(__target #(, #locals)*) },
    };
    let call = quote! { move |__target| #delegate };

    let render = match &sig.output {
        ReturnType::Default => quote! { |_| ::std::string::String::new() },
        ReturnType::Type(_, ty) if is_unit(ty) => quote! { |_| ::std::string::String::new() },
        ReturnType::Type(..) => quote! { |__ret| ::std::string::ToString::to_string(__ret) },
    };

    let intercept = if is_mut {
        format_ident!("__intercept_mut")
    } else {
        format_ident!("__intercept")
    };
    let method_name = method_ident.to_string();
    let vis = &func.vis;
    // Trait impls sit directly on ContractProxy; inherent methods live on the
    // synthesized struct and reach the proxy through its `inner` field.
    let receiver = match trait_path {
        Some(_) => quote! { self },
        None => quote! { self.inner },
    };

    Ok(quote! {
        #vis #proxy_sig {
            let __binding = #binding;
            #receiver.#intercept(#method_name, __binding, #call, #render)
        }
    })
}

fn is_unit(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(tuple) if tuple.elems.is_empty())
}
