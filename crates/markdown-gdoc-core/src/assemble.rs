use crate::operation::OperationBatch;

/// Header operations followed by body operations, each in its own order.
pub fn assemble(header: OperationBatch, body: OperationBatch) -> OperationBatch {
    log::debug!(
        "assembling {} header and {} body operations",
        header.len(),
        body.len()
    );
    let mut operations = header.into_vec();
    operations.extend(body);
    operations.into()
}
