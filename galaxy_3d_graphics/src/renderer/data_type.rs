/// Data types used by vertex attributes and shader constants

/// Scalar component of a `DataType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Integer,
    UnsignedInteger,
    Float,
}

impl ComponentType {
    pub fn size(&self) -> u32 {
        match self {
            ComponentType::Byte | ComponentType::UnsignedByte => 1,
            ComponentType::Short | ComponentType::UnsignedShort => 2,
            ComponentType::Integer | ComponentType::UnsignedInteger | ComponentType::Float => 4,
        }
    }
}

/// Vertex attribute or shader constant type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Byte,
    ByteNorm,
    UnsignedByte,
    UnsignedByteNorm,
    ByteVector2,
    ByteVector2Norm,
    UnsignedByteVector2,
    UnsignedByteVector2Norm,
    ByteVector3,
    ByteVector3Norm,
    UnsignedByteVector3,
    UnsignedByteVector3Norm,
    ByteVector4,
    ByteVector4Norm,
    UnsignedByteVector4,
    UnsignedByteVector4Norm,
    Short,
    ShortNorm,
    UnsignedShort,
    UnsignedShortNorm,
    ShortVector2,
    ShortVector2Norm,
    UnsignedShortVector2,
    UnsignedShortVector2Norm,
    ShortVector3,
    ShortVector3Norm,
    UnsignedShortVector3,
    UnsignedShortVector3Norm,
    ShortVector4,
    ShortVector4Norm,
    UnsignedShortVector4,
    UnsignedShortVector4Norm,
    Integer,
    UnsignedInteger,
    IntegerVector2,
    UnsignedIntegerVector2,
    IntegerVector3,
    UnsignedIntegerVector3,
    IntegerVector4,
    UnsignedIntegerVector4,
    Float,
    FloatVector2,
    FloatVector3,
    FloatVector4,
    FloatMatrix3,
    FloatMatrix4,
}

impl DataType {
    /// Scalar component type
    pub fn component_type(&self) -> ComponentType {
        use DataType::*;
        match self {
            Byte | ByteNorm | ByteVector2 | ByteVector2Norm | ByteVector3 | ByteVector3Norm
            | ByteVector4 | ByteVector4Norm => ComponentType::Byte,
            UnsignedByte | UnsignedByteNorm | UnsignedByteVector2 | UnsignedByteVector2Norm
            | UnsignedByteVector3 | UnsignedByteVector3Norm | UnsignedByteVector4
            | UnsignedByteVector4Norm => ComponentType::UnsignedByte,
            Short | ShortNorm | ShortVector2 | ShortVector2Norm | ShortVector3 | ShortVector3Norm
            | ShortVector4 | ShortVector4Norm => ComponentType::Short,
            UnsignedShort | UnsignedShortNorm | UnsignedShortVector2 | UnsignedShortVector2Norm
            | UnsignedShortVector3 | UnsignedShortVector3Norm | UnsignedShortVector4
            | UnsignedShortVector4Norm => ComponentType::UnsignedShort,
            Integer | IntegerVector2 | IntegerVector3 | IntegerVector4 => ComponentType::Integer,
            UnsignedInteger | UnsignedIntegerVector2 | UnsignedIntegerVector3
            | UnsignedIntegerVector4 => ComponentType::UnsignedInteger,
            Float | FloatVector2 | FloatVector3 | FloatVector4 | FloatMatrix3 | FloatMatrix4 => {
                ComponentType::Float
            }
        }
    }

    /// Number of scalar components
    pub fn component_count(&self) -> u32 {
        use DataType::*;
        match self {
            Byte | ByteNorm | UnsignedByte | UnsignedByteNorm | Short | ShortNorm | UnsignedShort
            | UnsignedShortNorm | Integer | UnsignedInteger | Float => 1,
            ByteVector2 | ByteVector2Norm | UnsignedByteVector2 | UnsignedByteVector2Norm
            | ShortVector2 | ShortVector2Norm | UnsignedShortVector2 | UnsignedShortVector2Norm
            | IntegerVector2 | UnsignedIntegerVector2 | FloatVector2 => 2,
            ByteVector3 | ByteVector3Norm | UnsignedByteVector3 | UnsignedByteVector3Norm
            | ShortVector3 | ShortVector3Norm | UnsignedShortVector3 | UnsignedShortVector3Norm
            | IntegerVector3 | UnsignedIntegerVector3 | FloatVector3 => 3,
            ByteVector4 | ByteVector4Norm | UnsignedByteVector4 | UnsignedByteVector4Norm
            | ShortVector4 | ShortVector4Norm | UnsignedShortVector4 | UnsignedShortVector4Norm
            | IntegerVector4 | UnsignedIntegerVector4 | FloatVector4 => 4,
            FloatMatrix3 => 9,
            FloatMatrix4 => 16,
        }
    }

    /// Whether integer components are normalized to [0, 1] / [-1, 1]
    pub fn is_normalized(&self) -> bool {
        use DataType::*;
        matches!(
            self,
            ByteNorm
                | UnsignedByteNorm
                | ByteVector2Norm
                | UnsignedByteVector2Norm
                | ByteVector3Norm
                | UnsignedByteVector3Norm
                | ByteVector4Norm
                | UnsignedByteVector4Norm
                | ShortNorm
                | UnsignedShortNorm
                | ShortVector2Norm
                | UnsignedShortVector2Norm
                | ShortVector3Norm
                | UnsignedShortVector3Norm
                | ShortVector4Norm
                | UnsignedShortVector4Norm
        )
    }

    /// Whether the type is a matrix (not usable as a vertex attribute)
    pub fn is_matrix(&self) -> bool {
        matches!(self, DataType::FloatMatrix3 | DataType::FloatMatrix4)
    }

    /// Size in bytes
    pub fn size(&self) -> u32 {
        self.component_type().size() * self.component_count()
    }
}

#[cfg(test)]
#[path = "data_type_tests.rs"]
mod tests;
