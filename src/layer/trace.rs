//! Pass-through layer logging every message it sees.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Below, Flow, Layer, LayerError, stack::forward};
use crate::{
    Exchange,
    message::{EmptyMessage, Request, Response},
};

/// Logs each message at `debug` level and forwards it unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceLayer;

#[async_trait]
impl Layer for TraceLayer {
    async fn send_request(
        &self,
        _exchange: &Arc<Exchange>,
        request: Request,
        _below: Below<'_>,
    ) -> Result<Flow<Request>, LayerError> {
        tracing::debug!(
            method = %request.method(),
            payload_len = request.payload_size(),
            block1 = ?request.options().block1(),
            "sending request"
        );
        forward(request)
    }

    async fn send_response(
        &self,
        _exchange: &Arc<Exchange>,
        response: Response,
        _below: Below<'_>,
    ) -> Result<Flow<Response>, LayerError> {
        tracing::debug!(
            code = %response.code(),
            payload_len = response.payload_size(),
            block1 = ?response.options().block1(),
            block2 = ?response.options().block2(),
            "sending response"
        );
        forward(response)
    }

    async fn send_empty(
        &self,
        _exchange: &Arc<Exchange>,
        message: EmptyMessage,
        _below: Below<'_>,
    ) -> Result<Flow<EmptyMessage>, LayerError> {
        tracing::debug!(message_type = ?message.message_type(), "sending empty message");
        forward(message)
    }

    async fn receive_request(
        &self,
        _exchange: &Arc<Exchange>,
        request: Request,
        _below: Below<'_>,
    ) -> Result<Flow<Request>, LayerError> {
        tracing::debug!(
            method = %request.method(),
            payload_len = request.payload_size(),
            block1 = ?request.options().block1(),
            "received request"
        );
        forward(request)
    }

    async fn receive_response(
        &self,
        _exchange: &Arc<Exchange>,
        response: Response,
        _below: Below<'_>,
    ) -> Result<Flow<Response>, LayerError> {
        tracing::debug!(
            code = %response.code(),
            payload_len = response.payload_size(),
            block1 = ?response.options().block1(),
            block2 = ?response.options().block2(),
            "received response"
        );
        forward(response)
    }

    async fn receive_empty(
        &self,
        _exchange: &Arc<Exchange>,
        message: EmptyMessage,
        _below: Below<'_>,
    ) -> Result<Flow<EmptyMessage>, LayerError> {
        tracing::debug!(message_type = ?message.message_type(), "received empty message");
        forward(message)
    }
}
