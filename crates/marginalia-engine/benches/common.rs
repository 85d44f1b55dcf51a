// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_page(sections: usize) -> String {
    let mut page = String::from("<article>");
    for section in 0..sections {
        page.push_str(&format!(
            "<h2>Section {section}</h2>\
             <p>Some paragraph content with <em>multiple</em> sentences. \
             This helps create realistic document structure for benchmarking.</p>\
             <ul><li>Item one of {section}</li><li>Item <b>two</b> of {section}</li></ul>"
        ));
    }
    page.push_str("<p>The needle sits at the <i>very</i> end of the page.</p></article>");
    page
}
