use std::time::{ SystemTime, UNIX_EPOCH };
use pretty_assertions::assert_eq ;
use depender::{ Fetch, FetchError, FsFetch };

fn scratch_dir( name: &str ) -> std::path::PathBuf {
    let nanos = SystemTime::now().duration_since( UNIX_EPOCH ).unwrap().as_nanos();
    let dir = std::env::temp_dir().join( format!( "depender-{}-{}", name, nanos ));
    std::fs::create_dir_all( &dir ).unwrap();
    dir
}

#[tokio::test]
async fn leading_slash_stays_under_the_root() {

    let root = scratch_dir( "root" );
    std::fs::write( root.join( "a.wasm" ), "contents" ).unwrap();
    let fetch = FsFetch::new( &root );

    assert_eq!( fetch.fetch( "/a.wasm", false ).await.unwrap(), b"contents" );
    assert!( matches!( fetch.fetch( "missing.wasm", false ).await, Err( FetchError::Io { .. })));

    std::fs::remove_dir_all( root ).unwrap();

}

#[tokio::test]
async fn parent_components_are_rejected() {

    let base = scratch_dir( "escape" );
    let root = base.join( "root" );
    std::fs::create_dir_all( root.join( "nested" )).unwrap();
    std::fs::write( base.join( "secret.wasm" ), "outside" ).unwrap();
    std::fs::write( root.join( "nested" ).join( "a.wasm" ), "inside" ).unwrap();
    let fetch = FsFetch::new( &root );

    for locator in [ "../secret.wasm", "/nested/../../secret.wasm", "nested/../a.wasm" ] {
        let result = fetch.fetch( locator, false ).await ;
        assert!( matches!( &result, Err( FetchError::Rejected { locator: rejected, .. }) if rejected == locator ), "{}: {:?}", locator, result );
    }
    assert_eq!( fetch.fetch( "./nested/a.wasm", false ).await.unwrap(), b"inside" );

    std::fs::remove_dir_all( base ).unwrap();

}

#[tokio::test]
async fn cache_is_bypassed_on_request() {

    let root = scratch_dir( "cache" );
    std::fs::write( root.join( "a.wasm" ), "first" ).unwrap();
    let fetch = FsFetch::new( &root ).with_cache();

    assert_eq!( fetch.fetch( "a.wasm", false ).await.unwrap(), b"first" );
    std::fs::write( root.join( "a.wasm" ), "second" ).unwrap();
    assert_eq!( fetch.fetch( "a.wasm", false ).await.unwrap(), b"first" );
    assert_eq!( fetch.fetch( "a.wasm", true ).await.unwrap(), b"second" );

    std::fs::remove_dir_all( root ).unwrap();

}
