//! readorder - Print the reading order of detected comic page objects
//!
//! Reads pages of detector output as JSON and writes the content objects
//! back in reading order, one JSON document per line and page.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use panelorder_core::{
    DetectedObject, NormalizedBox, ObjectClass, OrderParams, Page, PageContext, PageLayout,
    ReadingDirection, read_order_layout,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Reading direction accepted on the command line and in page files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Direction {
    /// Left to right
    #[default]
    Ltr,
    /// Right to left (manga)
    Rtl,
}

impl From<Direction> for ReadingDirection {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Ltr => ReadingDirection::Ltr,
            Direction::Rtl => ReadingDirection::Rtl,
        }
    }
}

/// Print the reading order of the objects detected on comic pages.
#[derive(Parser, Debug)]
#[command(name = "readorder")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more JSON page files, or "-" for stdin
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Reading direction, overriding the one in each page file
    #[arg(short = 'D', long, value_enum)]
    direction: Option<Direction>,

    // === Tolerances (pixels on a 1988x3056 page) ===
    /// Top-edge tolerance between panels
    #[arg(long = "panel-min-diff")]
    panel_min_diff: Option<f64>,

    /// Top-edge tolerance between groups of a panel
    #[arg(long = "group-min-diff")]
    group_min_diff: Option<f64>,

    /// Edge snapping tolerance between objects of a group
    #[arg(long = "object-min-diff")]
    object_min_diff: Option<f64>,

    /// Maximum gap between objects of the same group
    #[arg(long = "neighbour-min-diff")]
    neighbour_min_diff: Option<f64>,

    /// Share of the lower object's width that must lie under the upper one
    /// for the pair to read top-down
    #[arg(long = "stacked-overlap-ratio")]
    stacked_overlap_ratio: Option<f64>,

    // === Output options ===
    /// Print the panel / group hierarchy instead of the flat order
    #[arg(short = 'l', long, action = ArgAction::SetTrue)]
    layout: bool,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,
}

#[derive(Debug, Deserialize)]
struct PageFile {
    width: u32,
    height: u32,
    #[serde(default)]
    direction: Direction,
    #[serde(default)]
    objects: Vec<ObjectRecord>,
}

/// One object as read from and written to JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ObjectRecord {
    id: i64,
    class: u32,
    probability: f32,
    /// Normalized [top, left, bottom, right].
    #[serde(rename = "box")]
    bbox: [f64; 4],
}

impl From<&ObjectRecord> for DetectedObject {
    fn from(r: &ObjectRecord) -> Self {
        let [top, left, bottom, right] = r.bbox;
        DetectedObject::new(
            r.id,
            ObjectClass::from_id(r.class),
            r.probability,
            NormalizedBox::new(top, left, bottom, right),
        )
    }
}

impl From<&DetectedObject> for ObjectRecord {
    fn from(o: &DetectedObject) -> Self {
        Self {
            id: o.id,
            class: o.class.id(),
            probability: o.probability,
            bbox: bbox_array(&o.bbox),
        }
    }
}

fn bbox_array(b: &NormalizedBox) -> [f64; 4] {
    [b.top, b.left, b.bottom, b.right]
}

#[derive(Debug, Serialize)]
struct OrderedPage {
    objects: Vec<ObjectRecord>,
}

#[derive(Debug, Serialize)]
struct PanelRecord {
    /// `None` for a panel synthesized around a group outside every panel.
    id: Option<i64>,
    #[serde(rename = "box")]
    bbox: [f64; 4],
    groups: Vec<GroupRecord>,
}

#[derive(Debug, Serialize)]
struct GroupRecord {
    #[serde(rename = "box")]
    bbox: [f64; 4],
    objects: Vec<ObjectRecord>,
}

#[derive(Debug, Serialize)]
struct LayoutPage {
    panels: Vec<PanelRecord>,
}

impl From<&PageLayout> for LayoutPage {
    fn from(layout: &PageLayout) -> Self {
        let panels = layout
            .panels
            .iter()
            .map(|p| PanelRecord {
                id: (!p.panel.is_synthetic()).then_some(p.panel.id),
                bbox: bbox_array(&p.panel.bbox),
                groups: p
                    .groups
                    .iter()
                    .map(|g| GroupRecord {
                        bbox: bbox_array(&g.bounds),
                        objects: g.objects.iter().map(ObjectRecord::from).collect(),
                    })
                    .collect(),
            })
            .collect();
        Self { panels }
    }
}

/// Build OrderParams from command line arguments.
fn build_params(args: &Args) -> Result<OrderParams> {
    let mut params = OrderParams::default();
    if let Some(v) = args.panel_min_diff {
        params.panel_min_diff = v;
    }
    if let Some(v) = args.group_min_diff {
        params.group_min_diff = v;
    }
    if let Some(v) = args.object_min_diff {
        params.object_min_diff = v;
    }
    if let Some(v) = args.neighbour_min_diff {
        params.object_neighbour_min_diff = v;
    }
    if let Some(v) = args.stacked_overlap_ratio {
        params.stacked_overlap_ratio = v;
    }
    params.validate()?;
    Ok(params)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

fn load_page(path: &Path, direction: Option<Direction>) -> Result<Page> {
    let text = read_input(path)?;
    let file: PageFile = serde_json::from_str(&text)
        .with_context(|| format!("invalid page file {}", path.display()))?;
    let direction = direction.unwrap_or(file.direction);
    let context = PageContext::new(file.width, file.height, direction.into())
        .with_context(|| format!("invalid page in {}", path.display()))?;
    debug!(
        path = %path.display(),
        objects = file.objects.len(),
        ?direction,
        "loaded page"
    );
    Ok(Page {
        context,
        objects: file.objects.iter().map(DetectedObject::from).collect(),
    })
}

fn write_layouts(pages: &[Page], params: &OrderParams, output: &mut dyn Write) -> Result<()> {
    for page in pages {
        let layout = read_order_layout(&page.objects, &page.context, params)?;
        serde_json::to_writer(&mut *output, &LayoutPage::from(&layout))?;
        writeln!(output)?;
    }
    Ok(())
}

fn write_orders(pages: &[Page], params: &OrderParams, output: &mut dyn Write) -> Result<()> {
    for ordered in panelorder_core::order_pages(pages, params) {
        let doc = OrderedPage {
            objects: ordered?.iter().map(ObjectRecord::from).collect(),
        };
        serde_json::to_writer(&mut *output, &doc)?;
        writeln!(output)?;
    }
    Ok(())
}

fn init_logging(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let params = build_params(&args)?;

    let stdin_inputs = args.files.iter().filter(|p| *p == Path::new("-")).count();
    if stdin_inputs > 1 {
        bail!("stdin (\"-\") can only be given once");
    }

    let pages = args
        .files
        .iter()
        .map(|path| load_page(path, args.direction))
        .collect::<Result<Vec<_>>>()?;
    info!(pages = pages.len(), layout = args.layout, "ordering pages");

    // Open output file or use stdout
    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    if args.layout {
        write_layouts(&pages, &params, output.as_mut())?;
    } else {
        write_orders(&pages, &params, output.as_mut())?;
    }

    output.flush()?;
    Ok(())
}
