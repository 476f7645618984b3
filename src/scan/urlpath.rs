// src/scan/urlpath.rs
// =============================================================================
// Small helpers for URL paths.
//
// URL paths always use '/' no matter the OS, so std::path is the wrong tool
// here: these functions work on plain strings.
// =============================================================================

// Joins path elements with '/', cleaning the result ("." and ".." resolved,
// repeated slashes collapsed). Empty elements are ignored.
//
// A trailing slash on the LAST element is preserved, because "admin/" and
// "admin" can be different resources on a web server.
//
// Examples:
//   join(&["/", "home"])          -> "/home"
//   join(&["/home", "about/"])    -> "/home/about/"
//   join(&["/home/", "../admin"]) -> "/admin"
pub fn join(elements: &[&str]) -> String {
    let non_empty: Vec<&str> = elements.iter().copied().filter(|e| !e.is_empty()).collect();
    if non_empty.is_empty() {
        return String::new();
    }

    let mut joined = clean(&non_empty.join("/"));

    if let Some(last) = elements.last() {
        if last.ends_with('/') && !joined.ends_with('/') {
            joined.push('/');
        }
    }

    joined
}

// Lexically cleans a slash-separated path
fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    match (rooted, body.is_empty()) {
        (true, _) => format!("/{}", body),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

// True when the last segment of the path contains a dot ("index.php",
// "image.jpg", ".htaccess")
pub fn has_extension(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .is_some_and(|segment| segment.contains('.'))
}
