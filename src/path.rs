//! Locator normalization.

use itertools::Itertools ;



/// Collapses runs of `/` into a single slash, leaving a leading `scheme://`
/// untouched.
///
/// ```
/// use depender::clean_double_slash ;
///
/// assert_eq!( clean_double_slash( "libs//more/Fx.wasm" ), "libs/more/Fx.wasm" );
/// assert_eq!( clean_double_slash( "http://host//libs/a.wasm" ), "http://host/libs/a.wasm" );
/// ```
pub fn clean_double_slash( locator: &str ) -> String {

    let ( prefix, rest ) = match locator.find( "://" ) {
        Some( index ) if locator[ ..index ].chars().all(| c | c.is_ascii_alphanumeric() || matches!( c, '+' | '-' | '.' )) && index > 0
            => locator.split_at( index + 3 ),
        _ => ( "", locator ),
    };

    let collapsed = rest.chars()
        .coalesce(| previous, current | match ( previous, current ) {
            ( '/', '/' ) => Ok( '/' ),
            pair => Err( pair ),
        })
        .collect::<String>();

    format!( "{prefix}{collapsed}" )

}

/// Joins locator segments with `/` and normalizes the result.
pub fn join_locator<'a>( segments: impl IntoIterator<Item = &'a str> ) -> String {
    clean_double_slash( &segments.into_iter().join( "/" ))
}
