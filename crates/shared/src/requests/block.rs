use serde::{Deserialize, Serialize};

use trailbldr_domain::{Block, BlockId, BlockKind};

/// Body of the block create routes and `PUT /blocks/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockData {
    pub position_block: u32,
    pub type_block: BlockKind,
    pub content_text: String,
    pub url_media: String,
    pub caption: String,
}

impl BlockData {
    /// Blank payload for a freshly-created block: first position, empty
    /// content.
    pub fn blank(kind: BlockKind) -> Self {
        Self {
            position_block: 1,
            type_block: kind,
            content_text: String::new(),
            url_media: String::new(),
            caption: String::new(),
        }
    }
}

impl From<&Block> for BlockData {
    fn from(block: &Block) -> Self {
        Self {
            position_block: block.position,
            type_block: block.kind,
            content_text: block.content_text.clone(),
            url_media: block.media_url.clone(),
            caption: block.caption.clone(),
        }
    }
}

/// Body of `PUT /scenarios/{id}/intro|outro/blocks/reorder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockOrderData {
    #[serde(rename = "blockIds")]
    pub block_ids: Vec<BlockId>,
}
