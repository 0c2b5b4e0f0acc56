/// On-disk records that have a fixed little-endian byte representation.
pub trait ByteSerializable {
    type BytesArrayType;

    fn to_bytes(&self) -> Self::BytesArrayType;

    /// Returns None if the bytes are too short or do not describe a valid record.
    fn from_bytes(bytes: &[u8]) -> Option<Self>
    where
        Self: core::marker::Sized;
}
