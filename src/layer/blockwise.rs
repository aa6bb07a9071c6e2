//! Layer applying blockwise transfer to requests and responses.
//!
//! Outgoing bodies above the configured threshold are replaced by their
//! first block and an assembler is attached to the exchange. Incoming
//! blocks are fed to the exchange's assemblers; partial messages are
//! suppressed while the layer asks for, or sends, the next block. Only the
//! fully reassembled message reaches the endpoint.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Below, Flow, Layer, LayerError};
#[cfg(feature = "metrics")]
use crate::metrics::{self, BlockKind, Direction};
use crate::{
    BlockwiseConfig,
    Exchange,
    assembler::{AssemblyError, AssemblyStatus, RequestBlockAssembler, ResponseBlockAssembler},
    block::BlockOption,
    exchange::lock,
    message::{EmptyMessage, Request, Response, ResponseCode},
};

/// Fragments and reassembles message bodies using Block1 and Block2.
///
/// The layer keeps no per-conversation state of its own; everything lives
/// on the [`Exchange`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockwiseLayer {
    config: BlockwiseConfig,
}

impl BlockwiseLayer {
    /// Create a layer governed by `config`.
    #[must_use]
    pub const fn new(config: BlockwiseConfig) -> Self { Self { config } }

    /// The settings in effect.
    #[must_use]
    pub const fn config(&self) -> &BlockwiseConfig { &self.config }

    /// Send `response` through this layer and then the layers beneath it.
    async fn respond(
        &self,
        exchange: &Arc<Exchange>,
        response: Response,
        below: Below<'_>,
    ) -> Result<(), LayerError> {
        let flow = self.send_response(exchange, response, below).await?;
        match flow.into_message() {
            Some(response) => below.send_response(exchange, response).await,
            None => Ok(()),
        }
    }

    /// Answer a request block the assembler refused with an error response.
    async fn reject_request_block(
        &self,
        exchange: &Arc<Exchange>,
        request: &Request,
        error: AssemblyError,
        below: Below<'_>,
    ) -> Result<(), LayerError> {
        tracing::warn!(%error, "rejecting request block");
        #[cfg(feature = "metrics")]
        metrics::inc_errors();

        let code = match error {
            AssemblyError::BodyTooLarge { .. } => ResponseCode::RequestEntityTooLarge,
            _ => ResponseCode::RequestEntityIncomplete,
        };
        let mut response = Response::piggybacked(request, code);
        if code == ResponseCode::RequestEntityTooLarge {
            let preferred = BlockOption::new(0, self.config.default_block_size_value(), false)
                .map_err(AssemblyError::from)?;
            response.options_mut().set_block1(preferred);
        }
        self.respond(exchange, response, below).await
    }

    /// Follow a Block1 acknowledgement with the next request block.
    ///
    /// Returns `true` when the acknowledgement is terminal and the response
    /// may be delivered.
    async fn advance_request(
        &self,
        exchange: &Arc<Exchange>,
        block1: BlockOption,
        below: Below<'_>,
    ) -> Result<bool, LayerError> {
        let assembler = exchange
            .request_assembler()
            .ok_or(LayerError::MissingRequestAssembler { block: block1 })?;

        let next = {
            let mut assembler = lock(&assembler);
            if assembler.is_complete() {
                None
            } else {
                // The peer may ask for smaller blocks but never larger ones.
                let current = assembler.current_szx().unwrap_or(block1.szx());
                let szx = block1.szx().min(current);
                let step = 1_u32 << (current.get() - szx.get());
                let num = assembler.current_num() + step;
                Some(assembler.block(szx, num))
            }
        };

        let Some(block) = next else {
            tracing::debug!(%block1, "block1 acknowledges the final request block");
            return Ok(true);
        };
        let block = block?;
        tracing::debug!(block1 = ?block.options().block1(), "sending next request block");
        exchange.set_current_request(block.clone());
        #[cfg(feature = "metrics")]
        metrics::inc_blocks(Direction::Outbound, BlockKind::Block1);
        below.send_request(exchange, block).await?;
        Ok(false)
    }

    /// Insert a Block2 block, acknowledge it, and return the reassembled
    /// response once complete.
    async fn collect_response_block(
        &self,
        exchange: &Arc<Exchange>,
        response: Response,
        block2: BlockOption,
        below: Below<'_>,
    ) -> Result<Option<Response>, LayerError> {
        tracing::debug!(%block2, payload_len = response.payload_size(), "response carries block2 option");
        #[cfg(feature = "metrics")]
        metrics::inc_blocks(Direction::Inbound, BlockKind::Block2);

        let limit = self.config.max_body_size_value();
        let assembler =
            exchange.response_assembler_or_insert_with(|| ResponseBlockAssembler::new(limit));
        let ack = EmptyMessage::ack_for(response.message_id());

        let outcome = {
            let mut assembler = lock(&assembler);
            assembler
                .insert(response)
                .map(|status| (status, assembler.assembled_response()))
        };
        if let Err(error) = &outcome {
            tracing::warn!(%error, %block2, "rejecting response block");
            #[cfg(feature = "metrics")]
            metrics::inc_errors();
        }

        // Receipt is acknowledged even when the block is refused.
        below.send_empty(exchange, ack).await?;
        let (status, assembled) = outcome?;

        match (status, assembled) {
            (AssemblyStatus::Complete, Some(mut assembled)) => {
                tracing::info!(
                    payload_len = assembled.payload_size(),
                    "response reassembled, delivering"
                );
                #[cfg(feature = "metrics")]
                metrics::inc_transfers(BlockKind::Block2);
                assembled.set_acknowledged(true);
                Ok(Some(assembled))
            }
            (AssemblyStatus::Duplicate, _) => {
                tracing::debug!(%block2, "ignoring duplicate response block");
                Ok(None)
            }
            _ => {
                tracing::debug!(%block2, "waiting for more response blocks");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl Layer for BlockwiseLayer {
    async fn send_request(
        &self,
        exchange: &Arc<Exchange>,
        request: Request,
        _below: Below<'_>,
    ) -> Result<Flow<Request>, LayerError> {
        if request.payload_size() <= self.config.max_message_size_value() {
            exchange.set_current_request(request.clone());
            return Ok(Flow::Forward(request));
        }

        tracing::info!(
            payload_len = request.payload_size(),
            "request payload exceeds max message size, sending in blocks"
        );
        let szx = self.config.default_block_size_value();
        let assembler = exchange.set_request_assembler(RequestBlockAssembler::for_request(request));
        let block = lock(&assembler).block(szx, 0)?;
        exchange.set_current_request(block.clone());
        #[cfg(feature = "metrics")]
        metrics::inc_blocks(Direction::Outbound, BlockKind::Block1);
        Ok(Flow::Transformed(block))
    }

    async fn send_response(
        &self,
        exchange: &Arc<Exchange>,
        mut response: Response,
        _below: Below<'_>,
    ) -> Result<Flow<Response>, LayerError> {
        // Only the next response may piggy-back the final request block's
        // acknowledgement.
        let block1 = exchange.take_block1_to_ack();

        if response.payload_size() > self.config.max_message_size_value() {
            tracing::info!(
                payload_len = response.payload_size(),
                "response payload exceeds max message size, sending in blocks"
            );
            let szx = self.config.default_block_size_value();
            let assembler =
                exchange.set_response_assembler(ResponseBlockAssembler::for_response(response, szx));
            let mut block = lock(&assembler).block(0)?;
            if let Some(block1) = block1 {
                block.options_mut().set_block1(block1);
            }
            exchange.set_current_response(block.clone());
            #[cfg(feature = "metrics")]
            metrics::inc_blocks(Direction::Outbound, BlockKind::Block2);
            return Ok(Flow::Transformed(block));
        }

        let flow = match block1 {
            Some(block1) => {
                response.options_mut().set_block1(block1);
                Flow::Transformed(response)
            }
            None => Flow::Forward(response),
        };
        if let Some(response) = flow.message() {
            exchange.set_current_response(response.clone());
        }
        Ok(flow)
    }

    async fn receive_request(
        &self,
        exchange: &Arc<Exchange>,
        request: Request,
        below: Below<'_>,
    ) -> Result<Flow<Request>, LayerError> {
        let Some(block1) = request.options().block1() else {
            exchange.set_request(request.clone());
            return Ok(Flow::Forward(request));
        };
        tracing::debug!(%block1, payload_len = request.payload_size(), "request carries block1 option");
        #[cfg(feature = "metrics")]
        metrics::inc_blocks(Direction::Inbound, BlockKind::Block1);

        let limit = self.config.max_body_size_value();
        let assembler =
            exchange.request_assembler_or_insert_with(|| RequestBlockAssembler::new(limit));
        let outcome = {
            let mut assembler = lock(&assembler);
            assembler
                .insert(request.clone())
                .map(|status| (status, assembler.assembled_request()))
        };

        match outcome {
            Err(error) => {
                self.reject_request_block(exchange, &request, error, below)
                    .await?;
                Ok(Flow::Suppress)
            }
            Ok((AssemblyStatus::Complete, Some(mut assembled))) => {
                tracing::info!(
                    payload_len = assembled.payload_size(),
                    "request reassembled, delivering"
                );
                #[cfg(feature = "metrics")]
                metrics::inc_transfers(BlockKind::Block1);
                exchange.set_block1_to_ack(assembled.options().block1());
                assembled.set_acknowledged(true);
                exchange.set_request(assembled.clone());
                Ok(Flow::Transformed(assembled))
            }
            Ok((AssemblyStatus::Duplicate, _)) if !block1.more() => {
                tracing::debug!(%block1, "ignoring duplicate final request block");
                Ok(Flow::Suppress)
            }
            Ok((status, _)) => {
                tracing::debug!(%block1, ?status, "waiting for more request blocks");
                // Only POST and PUT carry bodies, so Changed is the fitting
                // interim code.
                let mut continuation = Response::piggybacked(&request, ResponseCode::Changed);
                continuation
                    .options_mut()
                    .set_block1(block1.with_more(true));
                self.respond(exchange, continuation, below).await?;
                Ok(Flow::Suppress)
            }
        }
    }

    async fn receive_response(
        &self,
        exchange: &Arc<Exchange>,
        response: Response,
        below: Below<'_>,
    ) -> Result<Flow<Response>, LayerError> {
        let block1 = response.options().block1();
        let block2 = response.options().block2();

        // Block1 and Block2 are handled independently. The response reaches
        // the endpoint only if neither branch holds it back.
        let mut deliver = true;
        if let Some(block1) = block1 {
            tracing::debug!(%block1, "response carries block1 option");
            if response.code().is_success() {
                deliver &= self.advance_request(exchange, block1, below).await?;
            } else {
                // An error code ends the request transfer however the
                // option reads.
                tracing::info!(
                    %block1,
                    code = %response.code(),
                    "peer refused request blocks, abandoning transfer"
                );
            }
        }

        if let Some(block2) = block2 {
            let assembled = self
                .collect_response_block(exchange, response, block2, below)
                .await?;
            return Ok(match assembled {
                Some(assembled) if deliver => Flow::Transformed(assembled),
                _ => Flow::Suppress,
            });
        }

        Ok(if deliver {
            Flow::Forward(response)
        } else {
            Flow::Suppress
        })
    }

    async fn receive_empty(
        &self,
        exchange: &Arc<Exchange>,
        message: EmptyMessage,
        below: Below<'_>,
    ) -> Result<Flow<EmptyMessage>, LayerError> {
        let sending = exchange
            .response_assembler()
            .filter(|assembler| lock(assembler).is_sending());
        let Some(assembler) = sending else {
            return Ok(Flow::Forward(message));
        };
        if message.is_reset() {
            tracing::info!(
                message_id = ?message.message_id(),
                "peer reset the response transfer, dropping remaining blocks"
            );
            exchange.take_response_assembler();
            return Ok(Flow::Forward(message));
        }
        if !message.is_ack() {
            return Ok(Flow::Forward(message));
        }

        let next = {
            let mut assembler = lock(&assembler);
            (!assembler.is_complete()).then(|| {
                let num = assembler.current_num() + 1;
                assembler.block(num)
            })
        };
        let Some(block) = next else {
            tracing::debug!("final response block acknowledged");
            return Ok(Flow::Suppress);
        };

        let block = block?;
        tracing::debug!(block2 = ?block.options().block2(), "sending next response block");
        exchange.set_current_response(block.clone());
        #[cfg(feature = "metrics")]
        metrics::inc_blocks(Direction::Outbound, BlockKind::Block2);
        below.send_response(exchange, block).await?;
        Ok(Flow::Suppress)
    }
}
