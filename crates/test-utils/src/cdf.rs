//! Builder that serializes synthetic datasets as NetCDF classic bytes.
//!
//! Produces CDF-1 (or optionally CDF-2) files: big-endian header with
//! dimension and variable lists, then fixed-size variable payloads followed
//! by interleaved record payloads. This is test code; structural misuse
//! (unknown dimension names, wrong data lengths) panics with a message.

use bytes::Bytes;

const NC_DIMENSION: u32 = 0x0A;
const NC_VARIABLE: u32 = 0x0B;
const NC_ATTRIBUTE: u32 = 0x0C;

/// External data types of the classic format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdfType {
    Byte,
    Char,
    Short,
    Int,
    Float,
    Double,
}

impl CdfType {
    fn code(self) -> u32 {
        match self {
            CdfType::Byte => 1,
            CdfType::Char => 2,
            CdfType::Short => 3,
            CdfType::Int => 4,
            CdfType::Float => 5,
            CdfType::Double => 6,
        }
    }

    fn size(self) -> usize {
        match self {
            CdfType::Byte | CdfType::Char => 1,
            CdfType::Short => 2,
            CdfType::Int | CdfType::Float => 4,
            CdfType::Double => 8,
        }
    }

    fn encode(self, value: f64, out: &mut Vec<u8>) {
        match self {
            CdfType::Byte => out.push(value as i8 as u8),
            CdfType::Char => out.push(value as u8),
            CdfType::Short => out.extend_from_slice(&(value as i16).to_be_bytes()),
            CdfType::Int => out.extend_from_slice(&(value as i32).to_be_bytes()),
            CdfType::Float => out.extend_from_slice(&(value as f32).to_be_bytes()),
            CdfType::Double => out.extend_from_slice(&value.to_be_bytes()),
        }
    }
}

fn pad4(n: usize) -> usize {
    (n + 3) & !3
}

fn write_padded(out: &mut Vec<u8>, upto: usize) {
    while out.len() < upto {
        out.push(0);
    }
}

fn write_name(out: &mut Vec<u8>, name: &str) {
    out.extend_from_slice(&(name.len() as u32).to_be_bytes());
    let end = out.len() + pad4(name.len());
    out.extend_from_slice(name.as_bytes());
    write_padded(out, end);
}

struct BDim {
    name: String,
    len: usize,
    unlimited: bool,
}

struct BVar {
    name: String,
    dimids: Vec<usize>,
    ty: CdfType,
    fill: Option<f64>,
    data: Vec<f64>,
}

/// Builder for NetCDF classic test files.
pub struct CdfBuilder {
    version: u8,
    numrecs: usize,
    dims: Vec<BDim>,
    vars: Vec<BVar>,
}

impl Default for CdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CdfBuilder {
    pub fn new() -> Self {
        Self {
            version: 1,
            numrecs: 0,
            dims: Vec::new(),
            vars: Vec::new(),
        }
    }

    /// Emit a CDF-2 (64-bit offset) file instead of CDF-1.
    pub fn version2(mut self) -> Self {
        self.version = 2;
        self
    }

    /// Add a fixed-length dimension.
    pub fn dim(mut self, name: &str, len: usize) -> Self {
        self.dims.push(BDim {
            name: name.to_string(),
            len,
            unlimited: false,
        });
        self
    }

    /// Add the unlimited (record) dimension with `numrecs` records.
    pub fn unlimited_dim(mut self, name: &str, numrecs: usize) -> Self {
        assert!(
            !self.dims.iter().any(|d| d.unlimited),
            "only one unlimited dimension is allowed"
        );
        self.numrecs = numrecs;
        self.dims.push(BDim {
            name: name.to_string(),
            len: 0,
            unlimited: true,
        });
        self
    }

    /// Add a double-typed variable over the named dimensions.
    pub fn var(self, name: &str, dims: &[&str], data: Vec<f64>) -> Self {
        self.var_typed(name, dims, CdfType::Double, data, None)
    }

    /// Add a 1-D double coordinate variable over its same-named dimension.
    pub fn coord(self, name: &str, data: Vec<f64>) -> Self {
        self.var(name, &[name], data)
    }

    /// Add a variable with an explicit external type and optional fill value.
    pub fn var_typed(
        mut self,
        name: &str,
        dims: &[&str],
        ty: CdfType,
        data: Vec<f64>,
        fill: Option<f64>,
    ) -> Self {
        let dimids: Vec<usize> = dims
            .iter()
            .map(|d| {
                self.dims
                    .iter()
                    .position(|bd| bd.name == *d)
                    .unwrap_or_else(|| panic!("unknown dimension '{}'", d))
            })
            .collect();
        for (i, &id) in dimids.iter().enumerate() {
            assert!(
                !(self.dims[id].unlimited && i != 0),
                "record dimension must be the outermost axis of '{}'",
                name
            );
        }
        let expected: usize = dimids
            .iter()
            .map(|&id| {
                if self.dims[id].unlimited {
                    self.numrecs
                } else {
                    self.dims[id].len
                }
            })
            .product();
        assert_eq!(
            data.len(),
            expected,
            "variable '{}' data length mismatch",
            name
        );
        self.vars.push(BVar {
            name: name.to_string(),
            dimids,
            ty,
            fill,
            data,
        });
        self
    }

    /// Serialize into NetCDF classic bytes.
    pub fn build(self) -> Bytes {
        let record_dim = self.dims.iter().position(|d| d.unlimited);
        let is_record =
            |v: &BVar| record_dim.is_some() && v.dimids.first().copied() == record_dim;

        // Per-record slab size (bytes, unpadded) for a record variable;
        // full payload size for a fixed variable.
        let payload_bytes = |v: &BVar| -> usize {
            let count: usize = if is_record(v) {
                v.dimids[1..]
                    .iter()
                    .map(|&id| self.dims[id].len)
                    .product()
            } else {
                v.dimids.iter().map(|&id| self.dims[id].len).product()
            };
            count * v.ty.size()
        };

        // --- Header, with begin fields patched afterwards ---
        let mut out = Vec::new();
        out.extend_from_slice(b"CDF");
        out.push(self.version);
        out.extend_from_slice(&(self.numrecs as u32).to_be_bytes());

        // dim_list
        if self.dims.is_empty() {
            out.extend_from_slice(&[0u8; 8]);
        } else {
            out.extend_from_slice(&NC_DIMENSION.to_be_bytes());
            out.extend_from_slice(&(self.dims.len() as u32).to_be_bytes());
            for d in &self.dims {
                write_name(&mut out, &d.name);
                out.extend_from_slice(&(d.len as u32).to_be_bytes());
            }
        }

        // gatt_list (absent)
        out.extend_from_slice(&[0u8; 8]);

        // var_list
        let mut begin_positions = Vec::with_capacity(self.vars.len());
        if self.vars.is_empty() {
            out.extend_from_slice(&[0u8; 8]);
        } else {
            out.extend_from_slice(&NC_VARIABLE.to_be_bytes());
            out.extend_from_slice(&(self.vars.len() as u32).to_be_bytes());
            for v in &self.vars {
                write_name(&mut out, &v.name);
                out.extend_from_slice(&(v.dimids.len() as u32).to_be_bytes());
                for &id in &v.dimids {
                    out.extend_from_slice(&(id as u32).to_be_bytes());
                }
                // vatt_list
                match v.fill {
                    Some(fill) => {
                        out.extend_from_slice(&NC_ATTRIBUTE.to_be_bytes());
                        out.extend_from_slice(&1u32.to_be_bytes());
                        write_name(&mut out, "_FillValue");
                        out.extend_from_slice(&v.ty.code().to_be_bytes());
                        out.extend_from_slice(&1u32.to_be_bytes());
                        let end = out.len() + pad4(v.ty.size());
                        v.ty.encode(fill, &mut out);
                        write_padded(&mut out, end);
                    }
                    None => out.extend_from_slice(&[0u8; 8]),
                }
                out.extend_from_slice(&v.ty.code().to_be_bytes());
                out.extend_from_slice(&(pad4(payload_bytes(v)) as u32).to_be_bytes());
                begin_positions.push(out.len());
                match self.version {
                    1 => out.extend_from_slice(&[0u8; 4]),
                    _ => out.extend_from_slice(&[0u8; 8]),
                }
            }
        }

        // --- Offsets ---
        let mut begins = vec![0u64; self.vars.len()];
        let mut offset = out.len();
        for (i, v) in self.vars.iter().enumerate() {
            if !is_record(v) {
                begins[i] = offset as u64;
                offset += pad4(payload_bytes(v));
            }
        }
        let record_vars: Vec<usize> = (0..self.vars.len())
            .filter(|&i| is_record(&self.vars[i]))
            .collect();
        let single_record = record_vars.len() == 1;
        let mut rec_offset = offset;
        for &i in &record_vars {
            begins[i] = rec_offset as u64;
            let slab = payload_bytes(&self.vars[i]);
            rec_offset += if single_record { slab } else { pad4(slab) };
        }

        for (i, &pos) in begin_positions.iter().enumerate() {
            match self.version {
                1 => out[pos..pos + 4].copy_from_slice(&(begins[i] as u32).to_be_bytes()),
                _ => out[pos..pos + 8].copy_from_slice(&begins[i].to_be_bytes()),
            }
        }

        // --- Fixed variable payloads ---
        for v in self.vars.iter().filter(|v| !is_record(v)) {
            let end = out.len() + pad4(payload_bytes(v));
            for &value in &v.data {
                v.ty.encode(value, &mut out);
            }
            write_padded(&mut out, end);
        }

        // --- Record payloads, interleaved per record ---
        for rec in 0..self.numrecs {
            for &i in &record_vars {
                let v = &self.vars[i];
                let slab_count = payload_bytes(v) / v.ty.size();
                let start = rec * slab_count;
                let end_len = out.len()
                    + if single_record {
                        payload_bytes(v)
                    } else {
                        pad4(payload_bytes(v))
                    };
                for &value in &v.data[start..start + slab_count] {
                    v.ty.encode(value, &mut out);
                }
                write_padded(&mut out, end_len);
            }
        }

        Bytes::from(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_magic_and_numrecs() {
        let bytes = CdfBuilder::new()
            .unlimited_dim("time", 3)
            .dim("x", 2)
            .var("v", &["time", "x"], vec![0.0; 6])
            .build();
        assert_eq!(&bytes[0..4], b"CDF\x01");
        assert_eq!(&bytes[4..8], &3u32.to_be_bytes());
    }

    #[test]
    fn test_name_padding() {
        let mut out = Vec::new();
        write_name(&mut out, "x");
        // 4-byte length + 1 byte name padded to 4
        assert_eq!(out.len(), 8);
        assert_eq!(&out[0..4], &1u32.to_be_bytes());
        assert_eq!(out[4], b'x');
    }

    #[test]
    #[should_panic(expected = "data length mismatch")]
    fn test_length_mismatch_panics() {
        let _ = CdfBuilder::new()
            .dim("x", 3)
            .var("v", &["x"], vec![1.0, 2.0])
            .build();
    }
}
