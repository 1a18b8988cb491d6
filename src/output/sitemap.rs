//! Sitemap protocol writer
//!
//! Produces a `urlset` document in the `http://www.sitemaps.org/schemas/sitemap/0.9`
//! namespace with one `<url>` per page. Every entry carries the same
//! `lastmod`, the date of the run; `priority` and `changefreq` are never
//! written.

use crate::{WriteError, WriteResult};
use chrono::NaiveDate;
use fs2::FileExt;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// XML namespace of the sitemap protocol
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One `<url>` element of the sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
}

impl SitemapEntry {
    /// Pairs every URL with the run date, preserving order
    pub fn for_run(urls: &[String], date: NaiveDate) -> Vec<Self> {
        urls.iter()
            .map(|url| Self {
                loc: url.clone(),
                lastmod: date,
            })
            .collect()
    }
}

/// Writes the sitemap for `urls` to `path`
///
/// The document is rendered in memory, written to a temporary file in the
/// destination directory and renamed over `path`, so readers see either the
/// previous sitemap or the complete new one. The replacement keeps the
/// permissions of the file it replaces; a new sitemap is created world-readable
/// (0644 on Unix).
///
/// Concurrent writers to the same destination are serialized through an
/// advisory lock on `<path>.lock`. The lock file is left in place next to the
/// sitemap, so a web root serving the sitemap should exclude `*.lock`.
///
/// # Arguments
///
/// * `urls` - Page URLs, written in the given order
/// * `date` - The `lastmod` value for every entry
/// * `path` - Destination sitemap file
///
/// # Returns
///
/// * `Ok(())` - The sitemap is in place
/// * `Err(WriteError)` - Rendering, writing, or the final rename failed
pub fn write_sitemap(urls: &[String], date: NaiveDate, path: &Path) -> WriteResult<()> {
    let document = render_sitemap(&SitemapEntry::for_run(urls, date))?;

    let lock_path = lock_path_for(path);
    let lock = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|e| WriteError::io(&lock_path, e))?;
    FileExt::lock_exclusive(&lock).map_err(|e| WriteError::io(&lock_path, e))?;

    let replaced = replace_atomically(path, &document);
    let unlocked = FileExt::unlock(&lock);

    replaced?;
    unlocked.map_err(|e| WriteError::io(&lock_path, e))?;

    tracing::debug!("Wrote {} sitemap entries to {}", urls.len(), path.display());
    Ok(())
}

fn replace_atomically(path: &Path, document: &[u8]) -> WriteResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| WriteError::io(dir, e))?;
    temp.write_all(document)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| WriteError::io(temp.path(), e))?;
    match std::fs::metadata(path) {
        Ok(existing) => temp
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| WriteError::io(temp.path(), e))?,
        Err(_) => set_default_permissions(&temp)?,
    }

    temp.persist(path).map_err(|e| WriteError::Persist {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(unix)]
fn set_default_permissions(temp: &NamedTempFile) -> WriteResult<()> {
    use std::os::unix::fs::PermissionsExt;

    temp.as_file()
        .set_permissions(std::fs::Permissions::from_mode(0o644))
        .map_err(|e| WriteError::io(temp.path(), e))
}

#[cfg(not(unix))]
fn set_default_permissions(_temp: &NamedTempFile) -> WriteResult<()> {
    Ok(())
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

/// Renders the sitemap document as UTF-8 bytes
pub fn render_sitemap(entries: &[SitemapEntry]) -> WriteResult<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NAMESPACE)]),
        ))
        .map_err(xml_error)?;

    for entry in entries {
        writer
            .write_event(Event::Start(BytesStart::new("url")))
            .map_err(xml_error)?;
        write_text_element(&mut writer, "loc", &entry.loc)?;
        write_text_element(
            &mut writer,
            "lastmod",
            &entry.lastmod.format("%Y-%m-%d").to_string(),
        )?;
        writer
            .write_event(Event::End(BytesEnd::new("url")))
            .map_err(xml_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("urlset")))
        .map_err(xml_error)?;

    let mut document = writer.into_inner();
    document.push(b'\n');
    Ok(document)
}

/// Writes `<name>text</name>`, escaping the text
fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> WriteResult<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)?;
    Ok(())
}

fn xml_error(error: impl std::fmt::Display) -> WriteError {
    WriteError::Xml(error.to_string())
}
