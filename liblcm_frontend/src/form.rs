use std::path::{Path, PathBuf};

use super::config_store::{self, BackupPolicy, ConfigMap};
use super::error::{FormError, ValidationError};
use super::fields::{FieldSpec, LCM_FIELDS};

/// One editable entry of the form: the table row and the text currently typed in
#[derive(Debug, Clone)]
pub struct FormField {
    pub spec: &'static FieldSpec,
    pub text: String,
}

/// The editing session for a single configuration file.
///
/// Holds everything needed between load and save: the file path, the map as loaded
/// (so keys without a form field are written back untouched) and the user's text for
/// every field.
#[derive(Debug, Clone)]
pub struct ConfigForm {
    path: PathBuf,
    map: ConfigMap,
    pub fields: Vec<FormField>,
}

impl ConfigForm {
    /// Load the file at path and fill in display text for every field of the table
    pub fn load(path: &Path) -> Result<Self, FormError> {
        let map = config_store::load(path)?;
        let mut fields = Vec::with_capacity(LCM_FIELDS.len());
        for spec in LCM_FIELDS.iter() {
            let raw = map
                .get(spec.key)
                .ok_or_else(|| FormError::MissingField(spec.key.to_string()))?;
            fields.push(FormField {
                spec,
                text: spec.display(raw)?,
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
            map,
            fields,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.spec.key == key)
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.spec.key == key)
    }

    /// Replace the text of the field with the given key
    pub fn set_text(&mut self, key: &str, text: &str) -> Result<(), FormError> {
        let field = self
            .field_mut(key)
            .ok_or_else(|| FormError::UnknownField(key.to_string()))?;
        field.text = text.to_string();
        Ok(())
    }

    /// Apply a batch of `KEY=VALUE` edits.
    ///
    /// Every edit is checked for shape and key before any text is replaced, so a bad edit
    /// leaves the form as it was.
    pub fn apply_edits(&mut self, edits: &[String]) -> Result<(), FormError> {
        let mut parsed = Vec::with_capacity(edits.len());
        for edit in edits.iter() {
            let (key, value) = edit
                .split_once('=')
                .ok_or_else(|| FormError::BadEdit(edit.clone()))?;
            let key = key.trim();
            if self.field(key).is_none() {
                return Err(FormError::UnknownField(key.to_string()));
            }
            parsed.push((key, value.trim()));
        }
        for (key, value) in parsed {
            self.set_text(key, value)?;
        }
        Ok(())
    }

    /// Validate every field, then build the map to be written.
    ///
    /// Nothing is produced unless all fields pass.
    pub fn commit(&self) -> Result<ConfigMap, ValidationError> {
        let mut values = Vec::with_capacity(self.fields.len());
        for field in self.fields.iter() {
            values.push((field.spec.key, field.spec.commit(&field.text)?));
        }
        let mut map = self.map.clone();
        for (key, value) in values.iter() {
            map.set(key, value);
        }
        Ok(map)
    }

    /// Commit and write the result back to the file this form was loaded from
    pub fn save(&mut self, policy: BackupPolicy) -> Result<(), FormError> {
        let map = self.commit()?;
        config_store::save(&self.path, &map, policy)?;
        self.map = map;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LCM_CONF: &str = include_str!("../tests/data/lcm.conf");

    fn scratch_conf() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lcm.conf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(LCM_CONF.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_populates_every_field() {
        let (_dir, path) = scratch_conf();
        let form = ConfigForm::load(&path).unwrap();
        assert_eq!(form.fields.len(), LCM_FIELDS.len());
        assert_eq!(form.field("ip").unwrap().text, "192.168.1.2");
        assert_eq!(form.field("pulse_sets").unwrap().text, "1000");
        let delay: f64 = form.field("iu_pulse_delay").unwrap().text.parse().unwrap();
        assert!((delay - 6826.667).abs() < 0.01);
    }

    #[test]
    fn test_missing_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.conf");
        std::fs::write(&path, "ip = \"1.2.3.4\";\n").unwrap();
        assert!(matches!(
            ConfigForm::load(&path),
            Err(FormError::MissingField(_))
        ));
    }

    #[test]
    fn test_bad_field_leaves_file_untouched() {
        let (_dir, path) = scratch_conf();
        let mut form = ConfigForm::load(&path).unwrap();
        form.set_text("ip", "10.0.0.9").unwrap();
        form.set_text("tpc_pulse_width_2", "abc").unwrap();
        let result = form.save(BackupPolicy::Required);
        assert!(matches!(
            result,
            Err(FormError::Validation(ValidationError::NotANumber { .. }))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), LCM_CONF);
        assert!(!config_store::backup_path(&path).exists());
    }

    #[test]
    fn test_save_round_trip() {
        let (_dir, path) = scratch_conf();
        let mut form = ConfigForm::load(&path).unwrap();
        form.set_text("pulse_sets", "2000").unwrap();
        form.set_text("pd_pulse_delay", "13650").unwrap();
        form.save(BackupPolicy::Required).unwrap();

        let map = config_store::load(&path).unwrap();
        assert_eq!(map.get("pulse_sets"), Some("0x7d0"));
        assert_eq!(map.get("pd_pulse_delay"), Some("0xfff"));
        // keys without a form field survive
        assert_eq!(map.get("board_id"), Some("3"));
        let backup = std::fs::read_to_string(config_store::backup_path(&path)).unwrap();
        assert_eq!(backup, LCM_CONF);
    }

    #[test]
    fn test_malformed_edit_writes_nothing() {
        let (_dir, path) = scratch_conf();
        let mut form = ConfigForm::load(&path).unwrap();
        let edits = vec![String::from("ip=10.0.0.9"), String::from("pulse_sets 2000")];
        let result = form.apply_edits(&edits);
        assert!(matches!(result, Err(FormError::BadEdit(e)) if e == "pulse_sets 2000"));
        // the good edit was not applied either
        assert_eq!(form.field("ip").unwrap().text, "192.168.1.2");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), LCM_CONF);
        assert!(!config_store::backup_path(&path).exists());
    }

    #[test]
    fn test_apply_edits_then_save() {
        let (_dir, path) = scratch_conf();
        let mut form = ConfigForm::load(&path).unwrap();
        let edits = vec![String::from(" pulse_sets = 2000"), String::from("bias_control=0")];
        form.apply_edits(&edits).unwrap();
        form.save(BackupPolicy::Required).unwrap();
        let map = config_store::load(&path).unwrap();
        assert_eq!(map.get("pulse_sets"), Some("0x7d0"));
        assert_eq!(map.get("bias_control"), Some("0"));
    }

    #[test]
    fn test_unknown_field() {
        let (_dir, path) = scratch_conf();
        let mut form = ConfigForm::load(&path).unwrap();
        assert!(matches!(
            form.set_text("not_a_field", "1"),
            Err(FormError::UnknownField(_))
        ));
    }
}
