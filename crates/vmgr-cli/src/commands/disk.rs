//! `disk.ls`: list virtual storage objects on a datastore

use std::io::{self, Write};

use clap::Args;
use eyre::WrapErr;
use serde::Serialize;
use tracing::debug;
use vmgr_api::{Id, VStorageObject, VStorageObjectConfigInfo, VslmTagEntry};
use vmgr_client::VStorageObjectManager;

use crate::flags::DatastoreFlag;
use crate::output::{self, ResultWriter, TabWriter};

/// Name shown for IDs the inventory lists but cannot retrieve
pub const NOT_FOUND_NAME: &str = "not found: use 'disk.ls -R' to reconcile datastore inventory";

pub const LS_EXAMPLES: &str = "\
Examples:
  vmgr disk.ls
  vmgr disk.ls -l -T
  vmgr disk.ls -l e9b06a8b-d047-4d3c-b15b-43ea9608b1a6
  vmgr disk.ls -c k8s-region -t us-west-2";

#[derive(Debug, Clone, Default, Args)]
pub struct LsArgs {
    #[command(flatten)]
    pub datastore: DatastoreFlag,

    /// List IDs with missing file backing
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Long listing format
    #[arg(short = 'l', long = "long")]
    pub long: bool,

    /// Print disk backing path instead of disk name
    #[arg(short = 'L', long = "path")]
    pub path: bool,

    /// Reconcile the datastore inventory info
    #[arg(short = 'R', long = "reconcile")]
    pub reconcile: bool,

    /// Query tag category
    #[arg(short = 'c', long = "category", value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Query tag name
    #[arg(short = 't', long = "tag", value_name = "TAG")]
    pub tag: Option<String>,

    /// List attached tags
    #[arg(short = 'T', long = "tags")]
    pub tags: bool,

    /// Disk IDs to list [default: every disk on the datastore]
    #[arg(value_name = "ID")]
    pub ids: Vec<String>,
}

impl LsArgs {
    fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

/// A storage object together with the tags looked up for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskObject {
    #[serde(flatten)]
    pub object: VStorageObject,
    pub tags: Vec<VslmTagEntry>,
}

impl DiskObject {
    /// Placeholder for an ID whose object no longer exists
    pub fn missing(id: &str) -> Self {
        Self {
            object: VStorageObject {
                config: VStorageObjectConfigInfo {
                    id: Id::new(id),
                    name: NOT_FOUND_NAME.to_string(),
                    ..Default::default()
                },
            },
            tags: Vec::new(),
        }
    }

    /// Backing file path when requested and available, otherwise the name
    fn display_name(&self, path: bool) -> &str {
        if path && let Some(file) = self.object.disk_file_path() {
            return file;
        }
        &self.object.config.name
    }

    fn tag_list(&self) -> String {
        self.tags
            .iter()
            .map(|t| format!("{}:{}", t.parent_category_name, t.tag_name))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Result of a `disk.ls` run, in retrieval order
#[derive(Debug)]
pub struct LsResult {
    pub objects: Vec<DiskObject>,
    long: bool,
    path: bool,
    tags: bool,
}

impl LsResult {
    fn new(objects: Vec<DiskObject>, args: &LsArgs) -> Self {
        Self {
            objects,
            long: args.long,
            path: args.path,
            tags: args.tags,
        }
    }
}

impl ResultWriter for LsResult {
    type Dump = [DiskObject];

    fn write(&self, w: &mut dyn Write) -> io::Result<()> {
        let mut tw = TabWriter::new(2, 2);

        for o in &self.objects {
            let mut row = vec![
                o.object.id().to_string(),
                o.display_name(self.path).to_string(),
            ];
            if self.long {
                row.push(output::file_size(o.object.capacity_bytes()));
                row.push(output::stamp(o.object.config.create_time.as_ref()));
            }
            if self.tags {
                row.push(o.tag_list());
            }
            tw.row(row);
        }

        tw.flush(w)
    }

    fn dump(&self) -> &Self::Dump {
        &self.objects
    }
}

/// List storage objects through `manager`
///
/// Without explicit IDs every object on the datastore (or every object
/// carrying the queried tag) is listed; discovered IDs whose object has
/// vanished are skipped, or shown as placeholders with `-a`. Explicitly
/// requested IDs must all exist.
///
/// # Errors
/// Returns error if reconcile, discovery, tag lookup, or any retrieval
/// other than a tolerated not-found fails
pub async fn ls(manager: &dyn VStorageObjectManager, args: &LsArgs) -> eyre::Result<LsResult> {
    if args.reconcile {
        manager.reconcile_datastore_inventory().await?;
    }

    let discover = args.ids.is_empty();
    let ids = if discover {
        match args.category() {
            None => manager.list().await?,
            Some(category) => {
                let tag = args.tag.as_deref().unwrap_or_default();
                manager.list_attached_objects(category, tag).await?
            }
        }
    } else {
        args.ids.clone()
    };
    debug!(count = ids.len(), discover, "retrieving storage objects");

    let mut objects = Vec::with_capacity(ids.len());
    for id in &ids {
        let object = match manager.retrieve(id).await {
            Ok(object) => object,
            Err(e) if discover && e.is_not_found() => {
                // Deleted out from under the inventory, e.g. by a VM destroy
                debug!(%id, "listed object not found");
                if args.all {
                    objects.push(DiskObject::missing(id));
                }
                continue;
            }
            Err(e) => return Err(e).wrap_err_with(|| format!("retrieve {id:?}")),
        };

        let tags = if args.tags {
            manager.list_attached_tags(id).await?
        } else {
            Vec::new()
        };

        objects.push(DiskObject { object, tags });
    }

    Ok(LsResult::new(objects, args))
}
