#[allow( dead_code )]
mod fixture_root {

    /// Directory holding the fixtures of the test file `file`, named after it.
    pub fn fixture_root( file: &'static str ) -> std::path::PathBuf {
        std::path::PathBuf::from( file.strip_suffix( ".rs" ).expect( "test files end in .rs" ))
    }

}
