//! Packed raster records for transmission.
//!
//! Record layout (all fields little-endian):
//!   [0..8]     Neuron id: u64
//!   [8..8+8n]  Spike times: n x u64
//!   [..+4]     Delimiter: u32 0xDEADBEEF
//!
//! A decoder reads 4 bytes after the id or after each spike time; they either are the delimiter or the low half of the next spike time.
//! Spike times whose low 32 bits equal the delimiter are therefore not encodable.

use crate::error::SimError;
use crate::spike_train::SpikeTrain;

/// The record delimiter.
pub const RECORD_DELIMITER: u32 = 0xDEAD_BEEF;

/// A raster record, i.e., the non-negative spike times of a single trial of a neuron.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterRecord {
    /// The ID of the neuron.
    pub id: u64,
    /// The spike times (in ms).
    pub times: Vec<u64>,
}

impl RasterRecord {
    /// Create a record from a spike train.
    /// The function returns an error if a spike time is negative.
    pub fn from_spike_train(id: u64, spike_train: &SpikeTrain) -> Result<Self, SimError> {
        let times = spike_train
            .times()
            .iter()
            .map(|&t| {
                u64::try_from(t).map_err(|_| {
                    SimError::CodecError(format!("Negative spike time {} cannot be encoded", t))
                })
            })
            .collect::<Result<Vec<u64>, SimError>>()?;
        Ok(RasterRecord { id, times })
    }

    /// Convert the record into a spike train starting at `start_time`.
    pub fn into_spike_train(self, start_time: i64) -> Result<SpikeTrain, SimError> {
        let times = self
            .times
            .into_iter()
            .map(|t| {
                i64::try_from(t).map_err(|_| {
                    SimError::CodecError(format!("Spike time {} is out of range", t))
                })
            })
            .collect::<Result<Vec<i64>, SimError>>()?;
        SpikeTrain::build(start_time, &times)
    }

    /// Returns the size of the encoded record (in bytes).
    pub fn encoded_len(&self) -> usize {
        8 + 8 * self.times.len() + 4
    }
}

fn write_u32(w: &mut Vec<u8>, val: u32) {
    w.extend_from_slice(&val.to_le_bytes());
}

fn write_u64(w: &mut Vec<u8>, val: u64) {
    w.extend_from_slice(&val.to_le_bytes());
}

fn read_u32(buf: &[u8], pos: usize) -> Option<u32> {
    let bytes = buf.get(pos..pos + 4)?;
    let mut word = [0u8; 4];
    word.copy_from_slice(bytes);
    Some(u32::from_le_bytes(word))
}

fn read_u64(buf: &[u8], pos: usize) -> Option<u64> {
    let bytes = buf.get(pos..pos + 8)?;
    let mut word = [0u8; 8];
    word.copy_from_slice(bytes);
    Some(u64::from_le_bytes(word))
}

/// Append the encoded record to the buffer.
/// The function returns an error, leaving the buffer untouched, if a spike time collides with the delimiter.
pub fn encode_record(buf: &mut Vec<u8>, record: &RasterRecord) -> Result<(), SimError> {
    if let Some(t) = record
        .times
        .iter()
        .find(|&&t| t as u32 == RECORD_DELIMITER)
    {
        return Err(SimError::CodecError(format!(
            "Spike time {} collides with the record delimiter",
            t
        )));
    }

    buf.reserve(record.encoded_len());
    write_u64(buf, record.id);
    for &t in record.times.iter() {
        write_u64(buf, t);
    }
    write_u32(buf, RECORD_DELIMITER);
    Ok(())
}

/// Encode all records into a new buffer.
pub fn encode_records(records: &[RasterRecord]) -> Result<Vec<u8>, SimError> {
    let mut buf = Vec::with_capacity(records.iter().map(RasterRecord::encoded_len).sum());
    for record in records {
        encode_record(&mut buf, record)?;
    }
    Ok(buf)
}

/// Encode the spike trains of a raster set, the `n`-th one under id `id_offset + n`.
pub fn encode_rasters(rasters: &[SpikeTrain], id_offset: u64) -> Result<Vec<u8>, SimError> {
    let records = rasters
        .iter()
        .enumerate()
        .map(|(n, spike_train)| RasterRecord::from_spike_train(id_offset + n as u64, spike_train))
        .collect::<Result<Vec<RasterRecord>, SimError>>()?;
    encode_records(&records)
}

/// Decode the complete records at the head of the buffer.
/// Returns the records together with the number of bytes they span; a trailing partial record is left
/// for the caller to complete with more bytes.
pub fn decode_records(buf: &[u8]) -> (Vec<RasterRecord>, usize) {
    let mut records = vec![];
    let mut consumed = 0;

    'records: loop {
        let Some(id) = read_u64(buf, consumed) else {
            break;
        };

        let mut pos = consumed + 8;
        let mut times = vec![];
        loop {
            match read_u32(buf, pos) {
                None => break 'records,
                Some(RECORD_DELIMITER) => break,
                Some(_) => match read_u64(buf, pos) {
                    Some(t) => {
                        times.push(t);
                        pos += 8;
                    }
                    None => break 'records,
                },
            }
        }

        consumed = pos + 4;
        records.push(RasterRecord { id, times });
    }

    (records, consumed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<RasterRecord> {
        vec![
            RasterRecord {
                id: 3,
                times: vec![0, 17, 250, 1 << 40],
            },
            RasterRecord {
                id: 4,
                times: vec![],
            },
            RasterRecord {
                id: u64::MAX,
                times: vec![999],
            },
        ]
    }

    #[test]
    fn test_encode_layout() {
        let mut buf = vec![];
        encode_record(&mut buf, &RasterRecord { id: 1, times: vec![2] }).unwrap();
        assert_eq!(
            buf,
            vec![1, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0xEF, 0xBE, 0xAD, 0xDE]
        );
    }

    #[test]
    fn test_decode_encoded_records() {
        let records = records();
        let buf = encode_records(&records).unwrap();
        assert_eq!(buf.len(), records.iter().map(RasterRecord::encoded_len).sum::<usize>());
        assert_eq!(decode_records(&buf), (records, buf.len()));
    }

    #[test]
    fn test_decode_partial_record() {
        let records = records();
        let buf = encode_records(&records).unwrap();
        let first_len = records[0].encoded_len();

        // every cut inside the second record yields the first record only
        for cut in first_len..first_len + records[1].encoded_len() {
            let (decoded, consumed) = decode_records(&buf[..cut]);
            assert_eq!(decoded, records[..1].to_vec());
            assert_eq!(consumed, first_len);
        }

        // streaming: the unconsumed tail is completed by the next chunk
        let (head, consumed) = decode_records(&buf[..first_len + 5]);
        let mut tail = buf[consumed..first_len + 5].to_vec();
        tail.extend_from_slice(&buf[first_len + 5..]);
        let (rest, rest_consumed) = decode_records(&tail);
        assert_eq!(head.len() + rest.len(), 3);
        assert_eq!(rest_consumed, tail.len());

        assert_eq!(decode_records(&[]), (vec![], 0));
    }

    #[test]
    fn test_encode_errors() {
        let mut buf = vec![];
        let record = RasterRecord {
            id: 0,
            times: vec![5, 0x1_DEAD_BEEF],
        };
        assert!(matches!(
            encode_record(&mut buf, &record),
            Err(SimError::CodecError(_))
        ));
        assert!(buf.is_empty());

        let spike_train = SpikeTrain::build(-10, &[-3, 4]).unwrap();
        assert!(matches!(
            RasterRecord::from_spike_train(0, &spike_train),
            Err(SimError::CodecError(_))
        ));
        assert!(matches!(
            encode_rasters(&[spike_train], 0),
            Err(SimError::CodecError(_))
        ));
    }

    #[test]
    fn test_encode_rasters() {
        let rasters = vec![
            SpikeTrain::build(0, &[1, 5]).unwrap(),
            SpikeTrain::build(0, &[8]).unwrap(),
        ];
        let buf = encode_rasters(&rasters, 10).unwrap();
        let (records, _) = decode_records(&buf);
        assert_eq!(records.iter().map(|record| record.id).collect::<Vec<_>>(), vec![10, 11]);

        let spike_trains = records
            .into_iter()
            .map(|record| record.into_spike_train(0))
            .collect::<Result<Vec<SpikeTrain>, SimError>>()
            .unwrap();
        assert_eq!(spike_trains, rasters);
    }
}
