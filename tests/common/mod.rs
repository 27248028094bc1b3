#![allow(dead_code)]

pub mod temp_files {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Write `content` to a fresh temporary file with the given extension.
    /// The file is removed when the handle is dropped.
    pub fn create_temp_table(content: &str, ext: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("roundabout_test_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    pub fn create_temp_yaml(content: &str) -> NamedTempFile {
        create_temp_table(content, "yaml")
    }
}

pub mod handlers {
    use roundabout::Callback;

    /// Direct callback that tags its output with `name` and the params.
    pub fn tagged(name: &'static str) -> Callback<String> {
        Callback::direct(move |params: &[String]| format!("{name}({})", params.join(",")))
    }
}
