//! Primitive helper routine generation.
//!
//! Emits one little-endian encode/decode pair per registered primitive.
//! Integers are shifted byte by byte through the unsigned type of the same
//! width; floating point values are first copied bit-for-bit into that
//! unsigned type with `memcpy`.

use kissbuf_core::types::{PrimitiveType, ScalarRepr, TypeRegistry};

/// Generator for primitive helper bodies.
pub struct HelperGenerator<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> HelperGenerator<'a> {
    /// Creates a new helper generator.
    #[must_use]
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Generates helper bodies for every primitive, in registration order.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        for primitive in self.registry.iter() {
            output.push('\n');
            output.push_str(&self.generate_encode(primitive));
            output.push('\n');
            output.push_str(&self.generate_decode(primitive));
        }

        output
    }

    /// Generates `void encode(T value, uint8_t *buffer)`.
    fn generate_encode(&self, primitive: &PrimitiveType) -> String {
        let mut output = String::new();
        let bits = primitive.bits_type();

        output.push_str(&format!(
            "void {}({} value, uint8_t *buffer) {{\n",
            primitive.encode_fn, primitive.name
        ));
        match primitive.repr {
            ScalarRepr::Float => {
                output.push_str(&format!("    {bits} bits;\n"));
                output.push_str("    memcpy(&bits, &value, sizeof bits);\n");
            }
            ScalarRepr::Unsigned | ScalarRepr::Signed => {
                output.push_str(&format!("    {bits} bits = ({bits})value;\n"));
            }
        }
        for i in 0..primitive.byte_width {
            if i == 0 {
                output.push_str("    buffer[0] = (uint8_t)(bits & 0xFF);\n");
            } else {
                output.push_str(&format!(
                    "    buffer[{i}] = (uint8_t)((bits >> {}) & 0xFF);\n",
                    i * 8
                ));
            }
        }
        output.push_str("}\n");

        output
    }

    /// Generates `T decode(const uint8_t *buffer)`.
    fn generate_decode(&self, primitive: &PrimitiveType) -> String {
        let mut output = String::new();
        let bits = primitive.bits_type();

        output.push_str(&format!(
            "{} {}(const uint8_t *buffer) {{\n",
            primitive.name, primitive.decode_fn
        ));

        let terms: Vec<String> = (0..primitive.byte_width)
            .map(|i| {
                if i == 0 {
                    format!("({bits})buffer[0]")
                } else {
                    format!("(({bits})buffer[{i}] << {})", i * 8)
                }
            })
            .collect();
        let continuation = format!(" |\n{}", " ".repeat(bits.len() + 12));
        output.push_str(&format!("    {bits} bits = {};\n", terms.join(&continuation)));

        match primitive.repr {
            ScalarRepr::Float => {
                output.push_str(&format!("    {} value;\n", primitive.name));
                output.push_str("    memcpy(&value, &bits, sizeof value);\n");
                output.push_str("    return value;\n");
            }
            ScalarRepr::Unsigned | ScalarRepr::Signed => {
                output.push_str(&format!("    return ({})bits;\n", primitive.name));
            }
        }
        output.push_str("}\n");

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_int16_pair() {
        let registry = TypeRegistry::standard();
        let generator = HelperGenerator::new(&registry);
        let int16 = registry.get("int16_t").expect("int16_t registered");

        assert_eq!(
            generator.generate_encode(int16),
            "void serializeInt16LE(int16_t value, uint8_t *buffer) {\n\
             \x20   uint16_t bits = (uint16_t)value;\n\
             \x20   buffer[0] = (uint8_t)(bits & 0xFF);\n\
             \x20   buffer[1] = (uint8_t)((bits >> 8) & 0xFF);\n\
             }\n"
        );
        assert_eq!(
            generator.generate_decode(int16),
            "int16_t deserializeInt16LE(const uint8_t *buffer) {\n\
             \x20   uint16_t bits = (uint16_t)buffer[0] |\n\
             \x20                   ((uint16_t)buffer[1] << 8);\n\
             \x20   return (int16_t)bits;\n\
             }\n"
        );
    }

    #[test]
    fn test_generate_float_uses_memcpy() {
        let registry = TypeRegistry::standard();
        let generator = HelperGenerator::new(&registry);
        let float = registry.get("float").expect("float registered");

        let encode = generator.generate_encode(float);
        assert!(encode.contains("memcpy(&bits, &value, sizeof bits);"));
        assert!(encode.contains("buffer[3] = (uint8_t)((bits >> 24) & 0xFF);"));

        let decode = generator.generate_decode(float);
        assert!(decode.starts_with("float deserializeFloatLE(const uint8_t *buffer) {"));
        assert!(decode.contains("memcpy(&value, &bits, sizeof value);"));
    }

    #[test]
    fn test_generate_double_writes_eight_bytes() {
        let registry = TypeRegistry::standard();
        let generator = HelperGenerator::new(&registry);
        let double = registry.get("double").expect("double registered");

        let encode = generator.generate_encode(double);
        assert!(encode.contains("uint64_t bits;"));
        assert!(encode.contains("buffer[7] = (uint8_t)((bits >> 56) & 0xFF);"));
        assert!(!encode.contains("buffer[8]"));
    }

    #[test]
    fn test_generate_uint8_single_byte() {
        let registry = TypeRegistry::standard();
        let generator = HelperGenerator::new(&registry);
        let uint8 = registry.get("uint8_t").expect("uint8_t registered");

        let encode = generator.generate_encode(uint8);
        assert!(encode.starts_with("void serializeUint8(uint8_t value, uint8_t *buffer) {"));
        assert!(!encode.contains("buffer[1]"));
        assert!(generator
            .generate_decode(uint8)
            .contains("uint8_t bits = (uint8_t)buffer[0];"));
    }

    #[test]
    fn test_generate_covers_registry_in_order() {
        let registry = TypeRegistry::standard();
        let output = HelperGenerator::new(&registry).generate();

        let mut last = 0;
        for primitive in registry.iter() {
            let encode = output
                .find(&format!(" {}(", primitive.encode_fn))
                .expect("encode helper present");
            let decode = output
                .find(&format!(" {}(", primitive.decode_fn))
                .expect("decode helper present");
            assert!(last <= encode && encode < decode);
            last = decode;
        }
    }
}
