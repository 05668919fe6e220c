//! `#[injectable]` attribute implementation
//!
//! Scans an inherent impl block for functions marked `#[inject]`, strips the
//! markers, and emits an `Injectable` impl listing one constructor per marked
//! function. Every parameter of a marked function must be `Arc<T>`; `T` becomes
//! the dependency key, in parameter order.

use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::quote;
use syn::{
    parse::Result, parse_macro_input, Error, FnArg, GenericArgument, ImplItem, ImplItemFn, Item,
    ItemImpl, PathArguments, PathSegment, Type,
};

/// Main implementation function for the injectable macro
pub fn injectable_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = proc_macro2::TokenStream::from(args);
    if !args.is_empty() {
        return Error::new_spanned(args, "#[injectable] takes no arguments")
            .to_compile_error()
            .into();
    }

    let input_item = parse_macro_input!(input as Item);

    match process_injectable_item(input_item) {
        Ok(result) => result.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn process_injectable_item(item: Item) -> Result<proc_macro2::TokenStream> {
    match item {
        Item::Impl(item_impl) if item_impl.trait_.is_none() => process_injectable_impl(item_impl),
        other => Err(Error::new_spanned(
            other,
            "#[injectable] can only be applied to an inherent impl block",
        )),
    }
}

/// A function marked `#[inject]`
#[derive(Debug, Clone)]
struct ConstructorInfo {
    name: Ident,
    /// Inner types of the `Arc<T>` parameters, in order
    dependencies: Vec<Type>,
}

fn process_injectable_impl(mut item_impl: ItemImpl) -> Result<proc_macro2::TokenStream> {
    let mut constructors = Vec::new();

    for impl_item in &mut item_impl.items {
        if let ImplItem::Fn(method) = impl_item {
            if take_inject_marker(method) {
                constructors.push(analyze_constructor(method)?);
            }
        }
    }

    // zero or several markers still compile; registration reports them
    let injectable = generate_injectable_impl(&item_impl, &constructors);

    Ok(quote! {
        #item_impl

        #injectable
    })
}

/// Remove `#[inject]` from the method, reporting whether it was there
fn take_inject_marker(method: &mut ImplItemFn) -> bool {
    let before = method.attrs.len();
    method.attrs.retain(|attr| !attr.path().is_ident("inject"));
    method.attrs.len() != before
}

fn analyze_constructor(method: &ImplItemFn) -> Result<ConstructorInfo> {
    let signature = &method.sig;

    if signature.asyncness.is_some() {
        return Err(Error::new_spanned(
            signature,
            "#[inject] constructors cannot be async",
        ));
    }
    if !signature.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &signature.generics,
            "#[inject] constructors cannot be generic",
        ));
    }

    let mut dependencies = Vec::new();
    for input in &signature.inputs {
        match input {
            FnArg::Receiver(receiver) => {
                return Err(Error::new_spanned(
                    receiver,
                    "#[inject] constructors cannot take self",
                ));
            }
            FnArg::Typed(pat_type) => dependencies.push(extract_arc_inner_type(&pat_type.ty)?),
        }
    }

    Ok(ConstructorInfo {
        name: signature.ident.clone(),
        dependencies,
    })
}

/// Extract the generic type from a type segment
fn extract_generic_type(segment: &PathSegment) -> Result<Type> {
    if let PathArguments::AngleBracketed(args) = &segment.arguments {
        if let Some(GenericArgument::Type(inner_type)) = args.args.first() {
            return Ok(inner_type.clone());
        }
    }

    Err(Error::new_spanned(
        segment,
        "Failed to extract generic type from Arc<T>",
    ))
}

/// Extract the inner type from Arc<T>
fn extract_arc_inner_type(ty: &Type) -> Result<Type> {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Arc" {
                return extract_generic_type(segment);
            }
        }
    }

    Err(Error::new_spanned(
        ty,
        "#[inject] constructor parameters must be Arc<T>",
    ))
}

/// Generate the Injectable trait implementation
fn generate_injectable_impl(
    item_impl: &ItemImpl,
    constructors: &[ConstructorInfo],
) -> proc_macro2::TokenStream {
    let self_ty = &item_impl.self_ty;
    let (impl_generics, _, where_clause) = item_impl.generics.split_for_impl();

    let entries: Vec<proc_macro2::TokenStream> = constructors
        .iter()
        .map(|constructor| {
            let name = &constructor.name;
            let label = name.to_string();
            let types = &constructor.dependencies;

            quote! {
                ::depwire::InjectConstructor::new(
                    #label,
                    ::std::vec![#(::depwire::TypeKey::of::<#types>()),*],
                    |arguments: &mut ::depwire::Arguments| {
                        ::std::result::Result::Ok(Self::#name(#(arguments.next::<#types>()?),*))
                    },
                )
            }
        })
        .collect();

    quote! {
        impl #impl_generics ::depwire::Injectable for #self_ty #where_clause {
            #[allow(unused_variables)]
            fn inject_constructors() -> ::std::vec::Vec<::depwire::InjectConstructor<Self>> {
                ::std::vec![#(#entries),*]
            }
        }
    }
}
