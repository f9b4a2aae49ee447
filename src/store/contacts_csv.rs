use crate::error::StoreError;
use agenda_schema::{CONTACT_COLUMNS, Contact};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A flat CSV file of contacts.
///
/// There is no in-memory copy: every call reads the file again. Mutations load the whole
/// table, change it in memory and replace the file through a sibling temp file plus rename,
/// so a failed rewrite leaves the previous content in place.
///
/// The type does no locking of its own. Callers serialize access (see `store::actor`).
#[derive(Debug)]
pub struct ContactStore {
    path: PathBuf,
}

impl ContactStore {
    /// Opens the store at `path`, creating a header-only file (and parent directories) when
    /// nothing exists there yet. An existing file must carry the expected header.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };

        match fs::metadata(&store.path) {
            Ok(_) => {
                let count = store.read_all()?.len();
                info!(path = %store.path.display(), records = count, "Opened contact store");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)
                        .map_err(|e| StoreError::unavailable(parent, e))?;
                }
                store.rewrite(&[])?;
                info!(path = %store.path.display(), "Created empty contact store");
            }
            Err(e) => return Err(StoreError::unavailable(&store.path, e)),
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Contacts whose `first_name` contains `query`, ignoring case, in file order.
    pub fn find_by_name(&self, query: &str) -> Result<Vec<Contact>, StoreError> {
        let needle = query.to_lowercase();
        let mut contacts = self.read_all()?;
        contacts.retain(|c| c.first_name_contains(&needle));
        Ok(contacts)
    }

    /// Every contact in file order.
    pub fn list_all(&self) -> Result<Vec<Contact>, StoreError> {
        self.read_all()
    }

    /// Appends `contact` to the end of the file. Duplicate ids are accepted.
    ///
    /// A file without a header record (empty or blank lines only) gets the header first.
    /// A foreign header is `Corrupt` and the file is left as it was.
    pub fn insert(&self, contact: Contact) -> Result<Contact, StoreError> {
        let has_header = {
            let mut reader = self.reader()?;
            self.check_header(&mut reader)?
        };
        if !has_header {
            self.rewrite(&[])?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::unavailable(&self.path, e))?;

        let result = (|| -> csv::Result<()> {
            if !ends_with_newline(&mut file)? {
                file.write_all(b"\n")?;
            }
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut file);
            writer.serialize(&contact)?;
            writer.flush()?;
            Ok(())
        })();
        result.map_err(|e| StoreError::from_csv(&self.path, e))?;

        debug!(id = contact.id, "Appended contact");
        Ok(contact)
    }

    /// Replaces every contact whose id is `id` with `contact`.
    ///
    /// Returns `NotFound` without touching the file when nothing matches.
    pub fn update_by_id(&self, id: i64, contact: Contact) -> Result<Contact, StoreError> {
        let mut contacts = self.read_all()?;
        let mut matched = 0usize;
        for row in contacts.iter_mut().filter(|c| c.id == id) {
            *row = contact.clone();
            matched += 1;
        }
        if matched == 0 {
            return Err(StoreError::NotFound(id));
        }

        self.rewrite(&contacts)?;
        debug!(id, matched, "Updated contact");
        Ok(contact)
    }

    /// Removes every contact whose id is `id` and returns how many were removed.
    ///
    /// Returns `NotFound` without touching the file when nothing matches.
    pub fn delete_by_id(&self, id: i64) -> Result<usize, StoreError> {
        let mut contacts = self.read_all()?;
        let before = contacts.len();
        contacts.retain(|c| c.id != id);
        let removed = before - contacts.len();
        if removed == 0 {
            return Err(StoreError::NotFound(id));
        }

        self.rewrite(&contacts)?;
        debug!(id, removed, "Deleted contact");
        Ok(removed)
    }

    fn reader(&self) -> Result<csv::Reader<File>, StoreError> {
        let file = File::open(&self.path).map_err(|e| StoreError::unavailable(&self.path, e))?;
        Ok(csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file))
    }

    /// `Ok(false)` when the file has no header record yet.
    fn check_header(&self, reader: &mut csv::Reader<File>) -> Result<bool, StoreError> {
        let headers = reader
            .headers()
            .map_err(|e| StoreError::from_csv(&self.path, e))?;
        if headers.is_empty() {
            return Ok(false);
        }
        if !headers.iter().eq(CONTACT_COLUMNS) {
            return Err(StoreError::Corrupt {
                path: self.path.clone(),
                reason: format!(
                    "unexpected header {:?}, expected {:?}",
                    headers.iter().collect::<Vec<_>>(),
                    CONTACT_COLUMNS
                ),
            });
        }
        Ok(true)
    }

    fn read_all(&self) -> Result<Vec<Contact>, StoreError> {
        let mut reader = self.reader()?;
        // No header yet reads as an empty table.
        if !self.check_header(&mut reader)? {
            return Ok(Vec::new());
        }

        reader
            .deserialize::<Contact>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::from_csv(&self.path, e))
    }

    fn rewrite(&self, contacts: &[Contact]) -> Result<(), StoreError> {
        let tmp = temp_path(&self.path);

        let written = (|| -> csv::Result<()> {
            let file = File::create(&tmp)?;
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            writer.write_record(CONTACT_COLUMNS)?;
            for contact in contacts {
                writer.serialize(contact)?;
            }
            writer.flush()?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
            Ok(())
        })();

        let renamed = written
            .map_err(|e| StoreError::from_csv(&tmp, e))
            .and_then(|()| {
                fs::rename(&tmp, &self.path).map_err(|e| StoreError::unavailable(&self.path, e))
            });

        if renamed.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        renamed
    }
}

fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// `dir/contacts.csv` -> `dir/.contacts.csv.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| "contacts".as_ref()));
    name.push(".tmp");
    path.with_file_name(name)
}
