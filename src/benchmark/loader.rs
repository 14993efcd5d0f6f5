use super::Instance;
use crate::core::validation::{validate_records, ValidationOutcome};
use crate::errors::{Error, Result, ResultExt};
use crate::scoring::CountObservation;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Expand inputs into instance files.
///
/// Files are taken as given; directories are walked recursively for
/// `*.json`. The result is sorted and deduplicated.
pub fn discover_instance_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).follow_links(true) {
                let entry = entry.map_err(|e| {
                    Error::from(std::io::Error::other(e.to_string()))
                        .with_context(format!("walking {}", path.display()))
                })?;
                if entry.file_type().is_file() && is_json(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            return Err(Error::invalid_instance(path, "no such file or directory"));
        }
    }

    files.sort();
    files.dedup();
    debug!("Discovered {} instance files", files.len());
    Ok(files)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

pub fn load_instance(path: &Path) -> Result<Instance> {
    let contents = fs::read_to_string(path).context(format!("reading {}", path.display()))?;
    let fallback_name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    parse_instance(&contents, &fallback_name).map_err(|e| match e {
        Error::InvalidInstance { message, .. } => Error::invalid_instance(path, message),
        Error::Json(e) => Error::invalid_instance(path, e.to_string()),
        other => other,
    })
}

/// Load every instance under `paths`, stopping at the first unreadable file
pub fn load_instances(paths: &[PathBuf]) -> Result<Vec<Instance>> {
    discover_instance_files(paths)?
        .iter()
        .map(|path| load_instance(path))
        .collect()
}

/// Parse instance JSON; `fallback_name` is used when the document has no `name`.
pub fn parse_instance(contents: &str, fallback_name: &str) -> Result<Instance> {
    let document: Value = serde_json::from_str(contents)?;
    let object = document
        .as_object()
        .ok_or_else(|| Error::invalid_instance(fallback_name, "top level is not an object"))?;

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(fallback_name)
        .to_string();
    let group = object
        .get("group")
        .and_then(Value::as_str)
        .filter(|g| !g.trim().is_empty())
        .map(str::to_string);

    if is_count_shaped(object) {
        let ground_truth = count_field(object, "ground_truth", &name)?;
        let predicted = count_field(object, "predicted", &name)?;
        let mut instance = Instance::counting(name, ground_truth, predicted);
        instance.group = group;
        return Ok(instance);
    }

    let ground_truth = partition_field(object, "ground_truth", &name)?;
    let predicted = partition_field(object, "predicted", &name)?;
    let rejected = ground_truth.rejected.len() + predicted.rejected.len();

    Ok(Instance {
        name,
        group,
        ground_truth: ground_truth.partition,
        predicted: predicted.partition,
        counts: None,
        rejected,
    })
}

/// Both sides given as `{count, components}` objects rather than cluster lists
fn is_count_shaped(object: &serde_json::Map<String, Value>) -> bool {
    ["ground_truth", "predicted"]
        .iter()
        .all(|field| object.get(*field).is_some_and(Value::is_object))
}

const COUNT_KEYS: [&str; 2] = ["count", "number_of_diode_connected_transistors"];
const COMPONENT_KEYS: [&str; 2] = ["components", "transistor_names"];

fn count_field(
    object: &serde_json::Map<String, Value>,
    field: &str,
    instance: &str,
) -> Result<CountObservation> {
    let invalid = |message: String| Error::invalid_instance(instance, message);
    let side = object
        .get(field)
        .and_then(Value::as_object)
        .ok_or_else(|| invalid(format!("`{field}` must be an object")))?;

    let count = COUNT_KEYS
        .iter()
        .find_map(|key| side.get(*key))
        .ok_or_else(|| invalid(format!("`{field}` has no count")))?
        .as_u64()
        .ok_or_else(|| invalid(format!("`{field}` count must be a non-negative integer")))?;

    let components = match COMPONENT_KEYS.iter().find_map(|key| side.get(*key)) {
        None => Vec::new(),
        Some(value) => value
            .as_array()
            .ok_or_else(|| invalid(format!("`{field}` components must be an array")))?
            .iter()
            .map(|name| {
                name.as_str()
                    .ok_or_else(|| invalid(format!("`{field}` components must be strings")))
            })
            .collect::<Result<Vec<_>>>()?,
    };

    Ok(CountObservation::new(count, components))
}

fn partition_field(
    object: &serde_json::Map<String, Value>,
    field: &str,
    instance: &str,
) -> Result<ValidationOutcome> {
    let records = object
        .get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::invalid_instance(instance, format!("`{field}` must be an array")))?;

    let outcome = validate_records(records);
    for rejected in &outcome.rejected {
        warn!(
            instance,
            field,
            position = rejected.position,
            "Dropping record: {}",
            rejected.reason
        );
    }
    Ok(outcome)
}
