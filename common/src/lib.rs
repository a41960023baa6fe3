//! Picking Common Library
//!
//! ピッキング照合の中核ロジック（通信・ファイルI/Oなし）

pub mod types;
pub mod error;
pub mod codes;
pub mod matcher;
pub mod sequencing;
pub mod session;
pub mod tracker;
pub mod parser;

pub use types::{Item, Pallet, Shipment, Status, Operation, ItemProgress, PalletStatusUpdate, ShipmentStatusUpdate, PLACEHOLDER};
pub use error::{Error, Result};
pub use codes::{parse_label, parse_kanban, check_label_buffer, kanban_scan_complete, ClientLabel, KanbanCode, LABEL_LENGTH, KANBAN_SCAN_LENGTH};
pub use matcher::{find_item, match_scan, ItemMatch, MatchStrategy, STRATEGIES};
pub use sequencing::{check_sequence, classify, display_order, next_sequence, Regime};
pub use session::{check_leave_pallet, ScanSession, SUCCESS_NOTICE_MS};
pub use tracker::{all_items_finalized, apply_plan, plan_box_read, pallet_completion, shipment_completion, ScanPlan, WriteBack};
pub use parser::{interpret_write_response, parse_items_response, parse_pallets_response, parse_shipments_response};
