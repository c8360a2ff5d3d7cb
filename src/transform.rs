//! Inline external import maps into HTML documents.
//!
//! An import map referenced as `<script type="importmap" src="...">` is
//! replaced by the JSON it points to, embedded in the script element.

use std::{collections::HashMap, path::Path};

use lol_html::{
    element, errors::RewritingError, html_content::ContentType, html_content::Element,
    rewrite_str, RewriteStrSettings,
};
use serde_json::Value;

use crate::{resolve::resolve_src, util::url::local_path, Error};

const SRC: &str = "src";
const TYPE: &str = "type";

/// Return the `src` attribute of an external import map script.
///
/// Scripts of other types and inline import maps return `None`.
fn import_map_src(element: &Element) -> Option<String> {
    let script_type = element.get_attribute(TYPE)?;

    if !script_type.trim().eq_ignore_ascii_case("importmap") {
        return None;
    }

    element.get_attribute(SRC)
}

/// Extract the `src` attribute of every external import map, in document
/// order and without duplicates.
pub fn extract_import_map_srcs(content: impl AsRef<str>) -> Result<Vec<String>, RewritingError> {
    let mut srcs: Vec<String> = Vec::new();

    rewrite_str(content.as_ref(), RewriteStrSettings {
        element_content_handlers: vec![element!("script", |element| {
            if let Some(src) = import_map_src(element) {
                if !srcs.contains(&src) {
                    srcs.push(src);
                }
            }
            Ok(())
        })],
        ..RewriteStrSettings::default()
    })?;

    Ok(srcs)
}

/// Replace external import maps by inline ones.
///
/// `import_maps` maps `src` attribute values to the JSON text to embed.
/// Import maps whose `src` has no entry are left untouched.
pub fn rewrite_import_maps(
    content: impl AsRef<str>,
    import_maps: &HashMap<String, String>,
) -> Result<String, RewritingError> {
    rewrite_str(content.as_ref(), RewriteStrSettings {
        element_content_handlers: vec![element!("script", |element| {
            let Some(src) = import_map_src(element) else {
                return Ok(());
            };

            if let Some(json) = import_maps.get(&src) {
                element.remove_attribute(SRC);
                element.set_inner_content(json, ContentType::Html);
            }

            Ok(())
        })],
        ..RewriteStrSettings::default()
    })
}

/// Read and parse the import map located at `path`.
pub async fn load_import_map(path: impl AsRef<Path>) -> Result<Value, Error> {
    let path = path.as_ref();

    let content = tokio::fs::read(path)
        .await
        .map_err(|source| Error::LoadImportMap {
            path: path.to_owned(),
            source,
        })?;

    serde_json::from_slice(&content).map_err(|source| Error::ParseImportMap {
        path: path.to_owned(),
        source,
    })
}

/// Serialize an import map to compact JSON that can be embedded in a script
/// element.
///
/// `<` only occurs inside JSON strings, where it is escaped so the text can
/// never close the script element.
pub fn serialize_import_map(import_map: &Value) -> String {
    import_map.to_string().replace('<', "\\u003c")
}

/// Inline the external import maps of an HTML document.
///
/// Every `<script type="importmap" src="...">` element gets its `src`
/// attribute removed and the referenced JSON as content. The `src` is
/// resolved with [`resolve_src`] against `served_dir` and `document_path`.
/// Import maps with a remote `src` (e.g. `https://...`) are left untouched.
///
/// The rest of the document is preserved as is. Any import map that cannot be
/// read or parsed fails the whole transform.
pub async fn inline_import_maps(
    served_dir: impl AsRef<Path>,
    document_path: impl AsRef<Path>,
    content: &str,
) -> Result<String, Error> {
    let served_dir = served_dir.as_ref();
    let document_path = document_path.as_ref();

    let srcs = extract_import_map_srcs(content)?;

    if srcs.is_empty() {
        return Ok(content.to_owned());
    }

    let mut import_maps = HashMap::with_capacity(srcs.len());

    for src in srcs {
        let Some(src_path) = local_path(&src) else {
            tracing::debug!("Skipping remote import map {:?}", src);
            continue;
        };

        let path = resolve_src(served_dir, document_path, src_path);

        tracing::debug!("Inlining import map {:?} into {:?}", path, document_path);

        let import_map = load_import_map(&path).await?;
        import_maps.insert(src, serialize_import_map(&import_map));
    }

    if import_maps.is_empty() {
        return Ok(content.to_owned());
    }

    Ok(rewrite_import_maps(content, &import_maps)?)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use assert_fs::{prelude::*, TempDir};
    use serde_json::json;

    use super::inline_import_maps;
    use crate::Error;

    fn site() -> Result<TempDir> {
        let dir = TempDir::new()?;
        dir.child("maps/m.json")
            .write_str("{\n  \"imports\": {\n    \"x\": \"./x.js\"\n  }\n}\n")?;
        dir.child("maps/n.json")
            .write_str(r#"{ "imports": { "y": "./y.js" }, "scopes": {} }"#)?;
        dir.child("maps/invalid.json").write_str("{ imports: ")?;
        Ok(dir)
    }

    #[test]
    fn extract_import_map_srcs() {
        let srcs = super::extract_import_map_srcs(concat!(
            "<script type=\"importmap\" src=\"/a.json\"></script>\n", //
            "<script type=\"module\" src=\"/b.js\"></script>\n",      //
            "<script src=\"/c.js\"></script>\n",                      //
            "<script type=\"importmap\">{}</script>\n",               //
            "<script type=\" ImportMap \" src=\"d.json\"></script>\n", //
            "<script type=\"importmap\" src=\"/a.json\"></script>\n",
        ))
        .unwrap();

        assert_eq!(srcs, vec!["/a.json".to_string(), "d.json".to_string()]);
    }

    #[test]
    fn serialize_import_map() {
        assert_eq!(
            super::serialize_import_map(&json!({ "imports": { "x": "./x.js" } })),
            r#"{"imports":{"x":"./x.js"}}"#
        );
        assert_eq!(
            super::serialize_import_map(&json!({ "imports": { "</script>": "./x.js" } })),
            r#"{"imports":{"\u003c/script>":"./x.js"}}"#
        );
    }

    #[tokio::test]
    async fn inline_absolute_src() -> Result<()> {
        let dir = site()?;
        let document_path = dir.path().join("pages/a.html");

        let result = inline_import_maps(
            &dir,
            &document_path,
            r#"<head><script type="importmap" src="/maps/m.json"></script></head>"#,
        )
        .await?;

        assert_eq!(
            result,
            r#"<head><script type="importmap">{"imports":{"x":"./x.js"}}</script></head>"#
        );

        Ok(())
    }

    #[tokio::test]
    async fn inline_relative_src() -> Result<()> {
        let dir = site()?;
        dir.child("pages/maps/m.json")
            .write_str(r#"{ "imports": { "wrong": "./wrong.js" } }"#)?;
        let document_path = dir.path().join("pages/a.html");

        let result = inline_import_maps(
            &dir,
            &document_path,
            r#"<script type="importmap" src="../maps/m.json"></script>"#,
        )
        .await?;

        assert_eq!(
            result,
            r#"<script type="importmap">{"imports":{"x":"./x.js"}}</script>"#
        );

        Ok(())
    }

    #[tokio::test]
    async fn inline_multiple_import_maps() -> Result<()> {
        let dir = site()?;
        let document_path = dir.path().join("index.html");

        let input = concat!(
            "<!DOCTYPE html>\n",                                                      //
            "<html>\n",                                                               //
            "  <head>\n",                                                             //
            "    <script type=\"importmap\" src=\"maps/m.json\" id=\"a\"></script>\n", //
            "    <script type=\"module\" src=\"main.js\"></script>\n",                //
            "    <script type=\"importmap\" src=\"/maps/n.json\"></script>\n",        //
            "  </head>\n",                                                            //
            "  <body><p title='x'>Hello  world</p></body>\n",                         //
            "</html>\n"
        );

        let result = inline_import_maps(&dir, &document_path, input).await?;

        assert_eq!(
            result,
            concat!(
                "<!DOCTYPE html>\n",                                                  //
                "<html>\n",                                                           //
                "  <head>\n",                                                         //
                "    <script type=\"importmap\" id=\"a\">",                           //
                "{\"imports\":{\"x\":\"./x.js\"}}</script>\n",                        //
                "    <script type=\"module\" src=\"main.js\"></script>\n",            //
                "    <script type=\"importmap\">",                                    //
                "{\"imports\":{\"y\":\"./y.js\"},\"scopes\":{}}</script>\n",          //
                "  </head>\n",                                                        //
                "  <body><p title='x'>Hello  world</p></body>\n",                     //
                "</html>\n"
            )
        );

        Ok(())
    }

    #[tokio::test]
    async fn keep_inline_and_other_scripts() -> Result<()> {
        let dir = site()?;
        let document_path = dir.path().join("index.html");

        let input = concat!(
            "<script type=\"importmap\">{\"imports\":{}}</script>\n", //
            "<script type=\"module\" src=\"/maps/m.json\"></script>\n", //
            "<script src=\"/maps/m.json\"></script>\n",
        );

        let result = inline_import_maps(&dir, &document_path, input).await?;

        assert_eq!(result, input);

        Ok(())
    }

    #[tokio::test]
    async fn keep_remote_src() -> Result<()> {
        let dir = site()?;
        let document_path = dir.path().join("index.html");

        let input =
            r#"<script type="importmap" src="https://cdn.example.com/importmap.json"></script>"#;

        let result = inline_import_maps(&dir, &document_path, input).await?;

        assert_eq!(result, input);

        Ok(())
    }

    #[tokio::test]
    async fn idempotent() -> Result<()> {
        let dir = site()?;
        let document_path = dir.path().join("index.html");

        let input = r#"<head><script type="importmap" src="/maps/n.json"></script></head>"#;

        let once = inline_import_maps(&dir, &document_path, input).await?;
        let twice = inline_import_maps(&dir, &document_path, &once).await?;

        assert_ne!(once, input);
        assert_eq!(once, twice);

        Ok(())
    }

    #[tokio::test]
    async fn fail_missing_file() -> Result<()> {
        let dir = site()?;
        let document_path = dir.path().join("index.html");

        let result = inline_import_maps(
            &dir,
            &document_path,
            r#"<script type="importmap" src="/maps/missing.json"></script>"#,
        )
        .await;

        assert!(
            matches!(&result, Err(Error::LoadImportMap { path, .. }) if path.ends_with("maps/missing.json"))
        );

        Ok(())
    }

    #[tokio::test]
    async fn fail_invalid_json() -> Result<()> {
        let dir = site()?;
        let document_path = dir.path().join("index.html");

        let result = inline_import_maps(
            &dir,
            &document_path,
            r#"<script type="importmap" src="/maps/invalid.json"></script>"#,
        )
        .await;

        assert!(matches!(result, Err(Error::ParseImportMap { .. })));

        Ok(())
    }
}
