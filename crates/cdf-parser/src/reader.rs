//! Header walk and payload decoding for the classic format.

use bytes::Bytes;
use tracing::debug;

use viz_common::{Dataset, Dimension, Variable};

use crate::error::{CdfError, CdfResult};

const NC_DIMENSION: u32 = 0x0A;
const NC_VARIABLE: u32 = 0x0B;
const NC_ATTRIBUTE: u32 = 0x0C;
const STREAMING: u32 = 0xFFFF_FFFF;

/// External data types of the classic format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NcType {
    Byte,
    Char,
    Short,
    Int,
    Float,
    Double,
}

impl NcType {
    fn from_code(code: u32) -> CdfResult<Self> {
        match code {
            1 => Ok(NcType::Byte),
            2 => Ok(NcType::Char),
            3 => Ok(NcType::Short),
            4 => Ok(NcType::Int),
            5 => Ok(NcType::Float),
            6 => Ok(NcType::Double),
            other => Err(CdfError::InvalidFormat(format!(
                "unknown external type code {}",
                other
            ))),
        }
    }

    /// External size in bytes.
    fn size(self) -> usize {
        match self {
            NcType::Byte | NcType::Char => 1,
            NcType::Short => 2,
            NcType::Int | NcType::Float => 4,
            NcType::Double => 8,
        }
    }
}

/// Round up to the 4-byte alignment the format pads everything to.
fn pad4(n: usize) -> usize {
    (n + 3) & !3
}

struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize, what: &'static str) -> CdfResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .ok_or(CdfError::Truncated(what))?;
        if end > self.buf.len() {
            return Err(CdfError::Truncated(what));
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u32(&mut self, what: &'static str) -> CdfResult<u32> {
        let b = self.take(4, what)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_u64(&mut self, what: &'static str) -> CdfResult<u64> {
        let b = self.take(8, what)?;
        Ok(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Read a name: length, bytes, then padding to a 4-byte boundary.
    fn read_name(&mut self, what: &'static str) -> CdfResult<String> {
        let len = self.read_u32(what)? as usize;
        let raw = self.take(pad4(len), what)?;
        Ok(String::from_utf8_lossy(&raw[..len]).into_owned())
    }
}

struct RawDim {
    name: String,
    /// Zero marks the record dimension.
    len: usize,
}

struct RawVar {
    name: String,
    dimids: Vec<usize>,
    ty: NcType,
    fill: Option<f64>,
    begin: u64,
}

/// Read `count` scalars of external type `ty` starting at `offset`,
/// widened to f64.
fn read_scalars(
    buf: &[u8],
    offset: usize,
    ty: NcType,
    count: usize,
    out: &mut Vec<f64>,
) -> CdfResult<()> {
    let nbytes = count
        .checked_mul(ty.size())
        .ok_or(CdfError::Truncated("variable data"))?;
    let end = offset
        .checked_add(nbytes)
        .ok_or(CdfError::Truncated("variable data"))?;
    if end > buf.len() {
        return Err(CdfError::Truncated("variable data"));
    }
    let bytes = &buf[offset..end];

    match ty {
        NcType::Byte => out.extend(bytes.iter().map(|&b| b as i8 as f64)),
        NcType::Char => out.extend(bytes.iter().map(|&b| b as f64)),
        NcType::Short => out.extend(
            bytes
                .chunks_exact(2)
                .map(|c| i16::from_be_bytes([c[0], c[1]]) as f64),
        ),
        NcType::Int => out.extend(
            bytes
                .chunks_exact(4)
                .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]) as f64),
        ),
        NcType::Float => out.extend(
            bytes
                .chunks_exact(4)
                .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]) as f64),
        ),
        NcType::Double => out.extend(bytes.chunks_exact(8).map(|c| {
            f64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
        })),
    }
    Ok(())
}

/// Parse an attribute list, returning the first numeric value of
/// `_FillValue` if present. Other attributes are consumed and discarded.
fn read_att_list(c: &mut Cursor<'_>) -> CdfResult<Option<f64>> {
    let tag = c.read_u32("attribute list tag")?;
    let nelems = c.read_u32("attribute list count")? as usize;
    if tag == 0 && nelems == 0 {
        return Ok(None);
    }
    if tag != NC_ATTRIBUTE {
        return Err(CdfError::InvalidFormat(format!(
            "expected attribute list tag, found {:#x}",
            tag
        )));
    }

    let mut fill = None;
    for _ in 0..nelems {
        let name = c.read_name("attribute name")?;
        let ty = NcType::from_code(c.read_u32("attribute type")?)?;
        let count = c.read_u32("attribute value count")? as usize;
        let offset = c.pos;
        c.take(pad4(count * ty.size()), "attribute values")?;

        if name == "_FillValue" && ty != NcType::Char && count >= 1 {
            let mut values = Vec::with_capacity(1);
            read_scalars(c.buf, offset, ty, 1, &mut values)?;
            fill = values.first().copied();
        }
    }
    Ok(fill)
}

fn read_dim_list(c: &mut Cursor<'_>) -> CdfResult<Vec<RawDim>> {
    let tag = c.read_u32("dimension list tag")?;
    let nelems = c.read_u32("dimension list count")? as usize;
    if tag == 0 && nelems == 0 {
        return Ok(Vec::new());
    }
    if tag != NC_DIMENSION {
        return Err(CdfError::InvalidFormat(format!(
            "expected dimension list tag, found {:#x}",
            tag
        )));
    }

    let mut dims = Vec::with_capacity(nelems);
    for _ in 0..nelems {
        let name = c.read_name("dimension name")?;
        let len = c.read_u32("dimension length")? as usize;
        dims.push(RawDim { name, len });
    }
    Ok(dims)
}

fn read_var_list(c: &mut Cursor<'_>, version: u8, ndims: usize) -> CdfResult<Vec<RawVar>> {
    let tag = c.read_u32("variable list tag")?;
    let nelems = c.read_u32("variable list count")? as usize;
    if tag == 0 && nelems == 0 {
        return Ok(Vec::new());
    }
    if tag != NC_VARIABLE {
        return Err(CdfError::InvalidFormat(format!(
            "expected variable list tag, found {:#x}",
            tag
        )));
    }

    let mut vars = Vec::with_capacity(nelems);
    for _ in 0..nelems {
        let name = c.read_name("variable name")?;
        let rank = c.read_u32("variable rank")? as usize;
        let mut dimids = Vec::with_capacity(rank);
        for _ in 0..rank {
            let id = c.read_u32("variable dimension id")? as usize;
            if id >= ndims {
                return Err(CdfError::InvalidFormat(format!(
                    "variable '{}' references unknown dimension id {}",
                    name, id
                )));
            }
            dimids.push(id);
        }
        let fill = read_att_list(c)?;
        let ty = NcType::from_code(c.read_u32("variable type")?)?;
        let _vsize = c.read_u32("variable vsize")?;
        let begin = match version {
            1 => c.read_u32("variable begin")? as u64,
            _ => c.read_u64("variable begin")?,
        };
        vars.push(RawVar {
            name,
            dimids,
            ty,
            fill,
            begin,
        });
    }
    Ok(vars)
}

/// Element count for a shape, rejecting header-claimed sizes that overflow.
fn checked_product(shape: &[usize]) -> CdfResult<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .ok_or_else(|| CdfError::InvalidFormat("claimed dimension sizes overflow".to_string()))
}

/// Per-record slab size in bytes for a record variable, before padding.
fn record_slab_bytes(var: &RawVar, dims: &[RawDim]) -> CdfResult<usize> {
    let count = checked_product(
        &var.dimids[1..]
            .iter()
            .map(|&id| dims[id].len)
            .collect::<Vec<_>>(),
    )?;
    count
        .checked_mul(var.ty.size())
        .ok_or_else(|| CdfError::InvalidFormat("claimed dimension sizes overflow".to_string()))
}

/// Parse a complete NetCDF classic file into a [`Dataset`].
pub fn parse_dataset(data: &Bytes) -> CdfResult<Dataset> {
    let mut c = Cursor::new(data.as_ref());

    let magic = c.take(4, "magic")?;
    if &magic[..3] != b"CDF" {
        return Err(CdfError::InvalidMagic);
    }
    let version = magic[3];
    if version != 1 && version != 2 {
        return Err(CdfError::UnsupportedVersion(version));
    }

    let numrecs = c.read_u32("numrecs")?;
    if numrecs == STREAMING {
        return Err(CdfError::Streaming);
    }
    let numrecs = numrecs as usize;

    let raw_dims = read_dim_list(&mut c)?;
    let _global_fill = read_att_list(&mut c)?;
    let raw_vars = read_var_list(&mut c, version, raw_dims.len())?;

    let record_dim = raw_dims.iter().position(|d| d.len == 0);

    // Record layout: record `r` of a record variable lives at
    // begin + r * recsize, where recsize spans one record of every record
    // variable. With exactly one record variable the slab is not padded.
    let record_vars: Vec<usize> = raw_vars
        .iter()
        .enumerate()
        .filter(|(_, v)| v.dimids.first().copied() == record_dim && record_dim.is_some())
        .map(|(i, _)| i)
        .collect();
    let recsize: usize = if record_vars.len() == 1 {
        record_slab_bytes(&raw_vars[record_vars[0]], &raw_dims)?
    } else {
        let mut sum = 0usize;
        for &i in &record_vars {
            let slab = pad4(record_slab_bytes(&raw_vars[i], &raw_dims)?);
            sum = sum
                .checked_add(slab)
                .ok_or_else(|| CdfError::InvalidFormat("record size overflows".to_string()))?;
        }
        sum
    };

    let mut variables = Vec::with_capacity(raw_vars.len());
    for (idx, var) in raw_vars.iter().enumerate() {
        if var.ty == NcType::Char {
            debug!(variable = %var.name, "Skipping non-numeric character variable");
            continue;
        }
        // Classic format requires the record dimension, when used, to be
        // the outermost axis.
        if let Some(rec) = record_dim {
            if var.dimids.get(1..).unwrap_or(&[]).contains(&rec) {
                return Err(CdfError::InvalidFormat(format!(
                    "variable '{}' uses the record dimension on an inner axis",
                    var.name
                )));
            }
        }

        let is_record = record_vars.contains(&idx);
        let shape: Vec<usize> = var
            .dimids
            .iter()
            .map(|&id| {
                if Some(id) == record_dim {
                    numrecs
                } else {
                    raw_dims[id].len
                }
            })
            .collect();
        let total = checked_product(&shape)?;

        // Validate the claimed extent against the actual buffer before any
        // allocation, so a malformed header fails cleanly instead of
        // panicking or exhausting memory.
        let begin =
            usize::try_from(var.begin).map_err(|_| CdfError::Truncated("variable data"))?;
        let nbytes = total
            .checked_mul(var.ty.size())
            .ok_or_else(|| CdfError::InvalidFormat("claimed dimension sizes overflow".to_string()))?;
        let span = if is_record && numrecs > 0 {
            let slab = record_slab_bytes(var, &raw_dims)?;
            recsize
                .checked_mul(numrecs - 1)
                .and_then(|n| n.checked_add(slab))
                .ok_or_else(|| CdfError::InvalidFormat("record size overflows".to_string()))?
        } else {
            nbytes
        };
        let end = begin
            .checked_add(span)
            .ok_or(CdfError::Truncated("variable data"))?;
        if end > c.buf.len() {
            return Err(CdfError::Truncated("variable data"));
        }

        let mut values = Vec::with_capacity(total);
        if is_record {
            let slab_count: usize = shape[1..].iter().product();
            for rec in 0..numrecs {
                let offset = begin + rec * recsize;
                read_scalars(c.buf, offset, var.ty, slab_count, &mut values)?;
            }
        } else {
            read_scalars(c.buf, begin, var.ty, total, &mut values)?;
        }

        if let Some(fill) = var.fill {
            for v in values.iter_mut() {
                if *v == fill {
                    *v = f64::NAN;
                }
            }
        }

        let dims: Vec<String> = var
            .dimids
            .iter()
            .map(|&id| raw_dims[id].name.clone())
            .collect();
        variables.push(Variable::new(var.name.clone(), dims, shape, values));
    }

    let dims: Vec<Dimension> = raw_dims
        .iter()
        .map(|d| {
            let len = if d.len == 0 { numrecs } else { d.len };
            Dimension::new(d.name.clone(), len)
        })
        .collect();

    debug!(
        dims = dims.len(),
        variables = variables.len(),
        numrecs,
        "Parsed NetCDF classic header"
    );

    Ok(Dataset::new(dims, variables))
}
