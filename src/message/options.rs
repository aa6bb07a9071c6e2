//! Option set carried by requests and responses.

use crate::block::BlockOption;

/// Options attached to a message.
///
/// Only the options the blockwise layer and its tests rely on are modelled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionSet {
    block1: Option<BlockOption>,
    block2: Option<BlockOption>,
    uri_path: Vec<String>,
    content_format: Option<u16>,
}

impl OptionSet {
    /// Return the Block1 option, describing request body fragmentation.
    #[must_use]
    pub const fn block1(&self) -> Option<BlockOption> { self.block1 }

    /// Return the Block2 option, describing response body fragmentation.
    #[must_use]
    pub const fn block2(&self) -> Option<BlockOption> { self.block2 }

    /// Report whether a Block1 option is present.
    #[must_use]
    pub const fn has_block1(&self) -> bool { self.block1.is_some() }

    /// Report whether a Block2 option is present.
    #[must_use]
    pub const fn has_block2(&self) -> bool { self.block2.is_some() }

    /// Set or replace the Block1 option.
    pub fn set_block1(&mut self, block: BlockOption) -> &mut Self {
        self.block1 = Some(block);
        self
    }

    /// Set or replace the Block2 option.
    pub fn set_block2(&mut self, block: BlockOption) -> &mut Self {
        self.block2 = Some(block);
        self
    }

    /// Remove the Block1 option.
    pub fn clear_block1(&mut self) -> &mut Self {
        self.block1 = None;
        self
    }

    /// Remove the Block2 option.
    pub fn clear_block2(&mut self) -> &mut Self {
        self.block2 = None;
        self
    }

    /// Return the Uri-Path segments.
    #[must_use]
    pub fn uri_path(&self) -> &[String] { &self.uri_path }

    /// Replace the Uri-Path with the segments of `path`.
    pub fn set_uri_path(&mut self, path: &str) -> &mut Self {
        self.uri_path = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect();
        self
    }

    /// Return the Content-Format option.
    #[must_use]
    pub const fn content_format(&self) -> Option<u16> { self.content_format }

    /// Set the Content-Format option.
    pub fn set_content_format(&mut self, format: u16) -> &mut Self {
        self.content_format = Some(format);
        self
    }
}
