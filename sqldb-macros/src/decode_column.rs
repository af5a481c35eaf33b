use quote::ToTokens;
use syn::{Field, Ident, LitStr, Meta, Type, parse::ParseBuffer};

#[derive(Debug)]
pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) name: String,
    pub(crate) primary_key: bool,
    pub(crate) auto_increment: bool,
    pub(crate) filter: Option<String>,
    pub(crate) descending: bool,
    /// The field is a record whose columns are inlined at this position.
    pub(crate) flatten: bool,
}

/// Reads `#[sqldb(...)]` on a field, `None` when the field is not mapped.
pub(crate) fn decode_column(field: &Field) -> Option<ColumnMetadata> {
    let attr = field.attrs.iter().find(|v| v.meta.path().is_ident("sqldb"))?;
    let ident = field
        .ident
        .clone()
        .expect("Field is expected to have a name");
    let mut name = ident.to_string();
    if name.starts_with("r#") {
        name.drain(..2);
    }
    let mut metadata = ColumnMetadata {
        ident,
        ty: field.ty.clone(),
        name,
        primary_key: false,
        auto_increment: false,
        filter: None,
        descending: false,
        flatten: false,
    };
    if let Meta::Path(..) = attr.meta {
        return Some(metadata);
    }
    let Ok(list) = attr.meta.require_list() else {
        panic!("Error while parsing `sqldb`, use it like: `#[sqldb(attribute = value, ...)]`");
    };
    let _ = list.parse_nested_meta(|arg| {
        if arg.path.is_ident("name") {
            let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                panic!("Error while parsing `name`, use it like: `#[sqldb(name = \"my_column\")]`");
            };
            metadata.name = v.value();
        } else if arg.path.is_ident("primary_key") {
            let Err(..) = arg.value() else {
                // value() is Err for Meta::Path
                panic!("Error while parsing `primary_key`, use it like: `#[sqldb(primary_key)]`");
            };
            metadata.primary_key = true;
        } else if arg.path.is_ident("auto_increment") {
            let Err(..) = arg.value() else {
                panic!(
                    "Error while parsing `auto_increment`, use it like: `#[sqldb(auto_increment)]`"
                );
            };
            metadata.auto_increment = true;
        } else if arg.path.is_ident("filter") {
            let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                panic!("Error while parsing `filter`, use it like: `#[sqldb(filter = \">=\")]`");
            };
            let v = v.value();
            if v.trim().is_empty() {
                panic!("`filter` cannot be empty");
            }
            metadata.filter = Some(v);
        } else if arg.path.is_ident("order") {
            let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                panic!("Error while parsing `order`, use it like: `#[sqldb(order = \"desc\")]`");
            };
            let v = v.value();
            metadata.descending = if v.eq_ignore_ascii_case("desc") {
                true
            } else if v.eq_ignore_ascii_case("asc") {
                false
            } else {
                panic!("Unknown order `{v}`, expected `asc` or `desc`");
            };
        } else if arg.path.is_ident("flatten") {
            let Err(..) = arg.value() else {
                panic!("Error while parsing `flatten`, use it like: `#[sqldb(flatten)]`");
            };
            metadata.flatten = true;
        } else {
            panic!(
                "Unknown attribute `{}` inside sqldb macro",
                arg.path.to_token_stream()
            );
        }
        Ok(())
    });
    if metadata.flatten
        && (metadata.primary_key || metadata.auto_increment || metadata.filter.is_some())
    {
        panic!(
            "Field `{}` is flattened, its column attributes belong to the embedded record",
            metadata.ident
        );
    }
    if metadata.name.is_empty() {
        panic!("Field `{}` has an empty column name", metadata.ident);
    }
    Some(metadata)
}
