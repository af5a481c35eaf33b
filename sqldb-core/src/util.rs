pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Longest prefix of `text` within `max` bytes that ends on a char boundary.
pub fn truncate_str(text: &str, max: usize) -> &str {
    let mut end = text.len().min(max);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            $crate::truncate_str(&$query, 497).trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}

/// Implements `Executor` by delegating to a field that already implements it.
#[macro_export]
macro_rules! impl_executor_transaction {
    ($driver:ty, $transaction:ty, $field:ident) => {
        impl $crate::Executor for $transaction {
            type Driver = $driver;

            fn driver(&self) -> &Self::Driver {
                $crate::Executor::driver(&self.$field)
            }

            fn server_version(&self) -> u32 {
                $crate::Executor::server_version(&self.$field)
            }

            fn prepare(
                &mut self,
                query: String,
            ) -> impl ::std::future::Future<Output = $crate::Result<$crate::Query<Self::Driver>>> + Send
            {
                $crate::Executor::prepare(&mut self.$field, query)
            }

            fn run(
                &mut self,
                query: $crate::Query<Self::Driver>,
            ) -> impl $crate::stream::Stream<Item = $crate::Result<$crate::QueryResult>> + Send {
                $crate::Executor::run(&mut self.$field, query)
            }

            fn fetch(
                &mut self,
                query: $crate::Query<Self::Driver>,
            ) -> impl $crate::stream::Stream<Item = $crate::Result<$crate::RowLabeled>> + Send {
                $crate::Executor::fetch(&mut self.$field, query)
            }

            fn execute(
                &mut self,
                query: $crate::Query<Self::Driver>,
            ) -> impl ::std::future::Future<Output = $crate::Result<$crate::RowsAffected>> + Send
            {
                $crate::Executor::execute(&mut self.$field, query)
            }
        }
    };
}
