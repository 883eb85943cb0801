//! Stack item implementation for the Neo Virtual Machine.
//!
//! Primitive items (booleans, integers, buffers and the fixed-width ledger values) are
//! compared by their byte representation. Arrays, maps and iterators are shared by
//! reference, so in-place mutation is visible to every holder. Structs compare by value
//! and are copied whenever they are written into a container.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use neo_core::{UInt160, UInt256};
use neo_cryptography::ECPoint;
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use crate::error::{VmError, VmResult};
use crate::stack_item::interop::{InteropValue, StorageContext};
use crate::stack_item::iterator::ItemIterator;
use crate::stack_item::map::MapItem;

/// Largest byte length an integer operand or result may have.
pub const MAX_BIG_INTEGER_SIZE: usize = 32;

/// Represents a value in the Neo VM.
#[derive(Clone)]
pub enum StackItem {
    /// The absence of a value, pushed by `PUSHNULL`.
    Null,

    /// Represents a boolean value.
    Boolean(bool),

    /// Represents an arbitrary precision integer.
    Integer(BigInt),

    /// Represents an immutable byte string.
    Buffer(Rc<[u8]>),

    /// Represents a shared, mutable array.
    Array(Rc<RefCell<Vec<StackItem>>>),

    /// Represents an array that is copied when stored into a container.
    Struct(Rc<RefCell<Vec<StackItem>>>),

    /// Represents a shared, mutable map.
    Map(Rc<RefCell<MapItem>>),

    UInt160(UInt160),
    UInt256(UInt256),
    ECPoint(ECPoint),

    /// Key/value iterator.
    Iterator(Rc<RefCell<ItemIterator>>),

    /// Value enumerator.
    Enumerator(Rc<RefCell<ItemIterator>>),

    /// Handle granting access to a contract's storage.
    StorageContext(StorageContext),

    /// Ledger entity exposed to scripts.
    Interop(Rc<InteropValue>),
}

/// Encodes an integer as minimal little-endian two's complement. Zero is empty.
pub fn bigint_to_bytes(value: &BigInt) -> Vec<u8> {
    if value.is_zero() {
        Vec::new()
    } else {
        value.to_signed_bytes_le()
    }
}

impl StackItem {
    /// Creates a boolean stack item.
    pub fn from_bool(value: bool) -> Self {
        StackItem::Boolean(value)
    }

    /// Creates an integer stack item.
    pub fn from_int<T: Into<BigInt>>(value: T) -> Self {
        StackItem::Integer(value.into())
    }

    /// Creates a buffer stack item.
    pub fn from_bytes(value: impl AsRef<[u8]>) -> Self {
        StackItem::Buffer(Rc::from(value.as_ref()))
    }

    /// Creates an empty buffer.
    pub fn empty() -> Self {
        StackItem::Buffer(Rc::from(Vec::new()))
    }

    /// Creates a new array from the given items.
    pub fn new_array(items: Vec<StackItem>) -> Self {
        StackItem::Array(Rc::new(RefCell::new(items)))
    }

    /// Creates a new struct from the given items.
    pub fn new_struct(items: Vec<StackItem>) -> Self {
        StackItem::Struct(Rc::new(RefCell::new(items)))
    }

    /// Creates a new, empty map.
    pub fn new_map() -> Self {
        StackItem::Map(Rc::new(RefCell::new(MapItem::new())))
    }

    /// Wraps a ledger entity.
    pub fn interop(value: InteropValue) -> Self {
        StackItem::Interop(Rc::new(value))
    }

    /// Wraps an iterator.
    pub fn iterator(iterator: ItemIterator) -> Self {
        StackItem::Iterator(Rc::new(RefCell::new(iterator)))
    }

    /// Wraps an enumerator.
    pub fn enumerator(enumerator: ItemIterator) -> Self {
        StackItem::Enumerator(Rc::new(RefCell::new(enumerator)))
    }

    /// Name of the item kind, used in conversion errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            StackItem::Null => "Null",
            StackItem::Boolean(_) => "Boolean",
            StackItem::Integer(_) => "Integer",
            StackItem::Buffer(_) => "Buffer",
            StackItem::Array(_) => "Array",
            StackItem::Struct(_) => "Struct",
            StackItem::Map(_) => "Map",
            StackItem::UInt160(_) => "UInt160",
            StackItem::UInt256(_) => "UInt256",
            StackItem::ECPoint(_) => "ECPoint",
            StackItem::Iterator(_) => "Iterator",
            StackItem::Enumerator(_) => "Enumerator",
            StackItem::StorageContext(_) => "StorageContext",
            StackItem::Interop(value) => value.type_name(),
        }
    }

    /// Returns true for items with a byte representation.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            StackItem::Boolean(_)
                | StackItem::Integer(_)
                | StackItem::Buffer(_)
                | StackItem::UInt160(_)
                | StackItem::UInt256(_)
                | StackItem::ECPoint(_)
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, StackItem::Null)
    }

    /// Returns true for arrays and structs.
    pub fn is_array(&self) -> bool {
        matches!(self, StackItem::Array(_) | StackItem::Struct(_))
    }

    /// Gets the byte representation of a primitive item.
    pub fn as_buffer(&self) -> VmResult<Vec<u8>> {
        match self {
            StackItem::Boolean(true) => Ok(vec![1]),
            StackItem::Boolean(false) => Ok(Vec::new()),
            StackItem::Integer(value) => Ok(bigint_to_bytes(value)),
            StackItem::Buffer(value) => Ok(value.to_vec()),
            StackItem::UInt160(value) => Ok(value.to_array().to_vec()),
            StackItem::UInt256(value) => Ok(value.to_array().to_vec()),
            StackItem::ECPoint(value) => Ok(value.to_vec()),
            other => Err(VmError::conversion(other.type_name(), "Buffer")),
        }
    }

    /// Gets the integer value of a primitive item.
    pub fn as_big_integer(&self) -> VmResult<BigInt> {
        match self {
            StackItem::Integer(value) => Ok(value.clone()),
            StackItem::Boolean(value) => Ok(BigInt::from(u8::from(*value))),
            other => {
                let bytes = other
                    .as_buffer()
                    .map_err(|_| VmError::conversion(other.type_name(), "Integer"))?;
                if bytes.len() > MAX_BIG_INTEGER_SIZE {
                    return Err(VmError::NumberTooLarge(hex::encode(&bytes)));
                }
                Ok(BigInt::from_signed_bytes_le(&bytes))
            }
        }
    }

    /// Gets the integer value as an `i64`.
    pub fn as_i64(&self) -> VmResult<i64> {
        let value = self.as_big_integer()?;
        value
            .to_i64()
            .ok_or_else(|| VmError::NumberTooLarge(value.to_string()))
    }

    /// Gets the truth value. Null is false; containers and ledger values are always
    /// true.
    pub fn as_boolean(&self) -> bool {
        match self {
            StackItem::Null => false,
            StackItem::Boolean(value) => *value,
            StackItem::Integer(value) => !value.is_zero(),
            StackItem::Buffer(value) => value.iter().any(|b| *b != 0),
            StackItem::UInt160(value) => !value.is_zero(),
            StackItem::UInt256(value) => !value.is_zero(),
            _ => true,
        }
    }

    /// Gets a snapshot of the elements of an array or struct.
    pub fn as_array(&self) -> VmResult<Vec<StackItem>> {
        match self {
            StackItem::Array(items) | StackItem::Struct(items) => Ok(items.borrow().clone()),
            other => Err(VmError::conversion(other.type_name(), "Array")),
        }
    }

    /// Gets the shared element vector of an array or struct.
    pub fn as_array_ref(&self) -> VmResult<Rc<RefCell<Vec<StackItem>>>> {
        match self {
            StackItem::Array(items) | StackItem::Struct(items) => Ok(Rc::clone(items)),
            other => Err(VmError::conversion(other.type_name(), "Array")),
        }
    }

    /// Gets the shared map.
    pub fn as_map(&self) -> VmResult<Rc<RefCell<MapItem>>> {
        match self {
            StackItem::Map(map) => Ok(Rc::clone(map)),
            other => Err(VmError::conversion(other.type_name(), "Map")),
        }
    }

    pub fn as_uint160(&self) -> VmResult<UInt160> {
        match self {
            StackItem::UInt160(value) => Ok(*value),
            other => {
                let bytes = other
                    .as_buffer()
                    .map_err(|_| VmError::conversion(other.type_name(), "UInt160"))?;
                UInt160::from_bytes(&bytes).map_err(|_| VmError::conversion("Buffer", "UInt160"))
            }
        }
    }

    pub fn as_uint256(&self) -> VmResult<UInt256> {
        match self {
            StackItem::UInt256(value) => Ok(*value),
            other => {
                let bytes = other
                    .as_buffer()
                    .map_err(|_| VmError::conversion(other.type_name(), "UInt256"))?;
                UInt256::from_bytes(&bytes).map_err(|_| VmError::conversion("Buffer", "UInt256"))
            }
        }
    }

    pub fn as_ecpoint(&self) -> VmResult<ECPoint> {
        match self {
            StackItem::ECPoint(value) => Ok(value.clone()),
            other => {
                let bytes = other
                    .as_buffer()
                    .map_err(|_| VmError::conversion(other.type_name(), "ECPoint"))?;
                ECPoint::from_bytes(&bytes).map_err(|_| VmError::conversion("Buffer", "ECPoint"))
            }
        }
    }

    /// Gets the UTF-8 string held by the item's bytes.
    pub fn as_string(&self) -> VmResult<String> {
        let bytes = self.as_buffer()?;
        String::from_utf8(bytes).map_err(|_| VmError::conversion(self.type_name(), "String"))
    }

    pub fn as_storage_context(&self) -> VmResult<StorageContext> {
        match self {
            StackItem::StorageContext(context) => Ok(*context),
            other => Err(VmError::conversion(other.type_name(), "StorageContext")),
        }
    }

    pub fn as_interop(&self) -> VmResult<&InteropValue> {
        match self {
            StackItem::Interop(value) => Ok(value),
            other => Err(VmError::conversion(other.type_name(), "InteropInterface")),
        }
    }

    /// Gets an iterator. Only iterators qualify.
    pub fn as_iterator(&self) -> VmResult<Rc<RefCell<ItemIterator>>> {
        match self {
            StackItem::Iterator(iterator) => Ok(Rc::clone(iterator)),
            other => Err(VmError::conversion(other.type_name(), "Iterator")),
        }
    }

    /// Gets an enumerator. Iterators are enumerators too.
    pub fn as_enumerator(&self) -> VmResult<Rc<RefCell<ItemIterator>>> {
        match self {
            StackItem::Iterator(iterator) | StackItem::Enumerator(iterator) => {
                Ok(Rc::clone(iterator))
            }
            other => Err(VmError::conversion(other.type_name(), "Enumerator")),
        }
    }

    /// Copies a struct, including nested structs. Other items are returned as is.
    pub fn copy_if_struct(&self) -> StackItem {
        match self {
            StackItem::Struct(items) => {
                let copied = items
                    .borrow()
                    .iter()
                    .map(StackItem::copy_if_struct)
                    .collect();
                StackItem::new_struct(copied)
            }
            other => other.clone(),
        }
    }

    /// Byte representation used to key maps.
    pub fn map_key(&self) -> VmResult<Vec<u8>> {
        if self.is_primitive() {
            self.as_buffer()
        } else {
            Err(VmError::conversion(self.type_name(), "map key"))
        }
    }

    /// Identity of a shared container, used for cycle detection.
    pub(crate) fn container_id(&self) -> Option<usize> {
        match self {
            StackItem::Array(items) | StackItem::Struct(items) => {
                Some(Rc::as_ptr(items) as *const () as usize)
            }
            StackItem::Map(map) => Some(Rc::as_ptr(map) as *const () as usize),
            _ => None,
        }
    }

    /// Equality as seen by `EQUAL`.
    pub fn equals(&self, other: &StackItem) -> bool {
        match (self, other) {
            (StackItem::Null, StackItem::Null) => true,
            (StackItem::Array(a), StackItem::Array(b)) => Rc::ptr_eq(a, b),
            (StackItem::Map(a), StackItem::Map(b)) => Rc::ptr_eq(a, b),
            (StackItem::Iterator(a), StackItem::Iterator(b))
            | (StackItem::Enumerator(a), StackItem::Enumerator(b)) => Rc::ptr_eq(a, b),
            (StackItem::Struct(a), StackItem::Struct(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
            }
            (StackItem::StorageContext(a), StackItem::StorageContext(b)) => a == b,
            (StackItem::Interop(a), StackItem::Interop(b)) => a == b,
            (a, b) if a.is_primitive() && b.is_primitive() => {
                matches!((a.as_buffer(), b.as_buffer()), (Ok(x), Ok(y)) if x == y)
            }
            _ => false,
        }
    }
}

impl PartialEq for StackItem {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Debug for StackItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackItem::Null => f.write_str("Null"),
            StackItem::Boolean(value) => write!(f, "Boolean({value})"),
            StackItem::Integer(value) => write!(f, "Integer({value})"),
            StackItem::Buffer(value) => write!(f, "Buffer({})", hex::encode(value)),
            StackItem::Array(items) => write!(f, "Array(len={})", items.borrow().len()),
            StackItem::Struct(items) => write!(f, "Struct(len={})", items.borrow().len()),
            StackItem::Map(map) => write!(f, "Map(len={})", map.borrow().len()),
            StackItem::UInt160(value) => write!(f, "{value:?}"),
            StackItem::UInt256(value) => write!(f, "{value:?}"),
            StackItem::ECPoint(value) => write!(f, "ECPoint({value})"),
            StackItem::Iterator(_) => f.write_str("Iterator"),
            StackItem::Enumerator(_) => f.write_str("Enumerator"),
            StackItem::StorageContext(context) => write!(f, "{context:?}"),
            StackItem::Interop(value) => write!(f, "Interop({})", value.type_name()),
        }
    }
}

impl From<bool> for StackItem {
    fn from(value: bool) -> Self {
        StackItem::Boolean(value)
    }
}

impl From<BigInt> for StackItem {
    fn from(value: BigInt) -> Self {
        StackItem::Integer(value)
    }
}

impl From<i64> for StackItem {
    fn from(value: i64) -> Self {
        StackItem::Integer(BigInt::from(value))
    }
}

impl From<Vec<u8>> for StackItem {
    fn from(value: Vec<u8>) -> Self {
        StackItem::Buffer(Rc::from(value))
    }
}

impl From<&[u8]> for StackItem {
    fn from(value: &[u8]) -> Self {
        StackItem::Buffer(Rc::from(value))
    }
}

impl From<&str> for StackItem {
    fn from(value: &str) -> Self {
        StackItem::from_bytes(value.as_bytes())
    }
}

impl From<UInt160> for StackItem {
    fn from(value: UInt160) -> Self {
        StackItem::UInt160(value)
    }
}

impl From<UInt256> for StackItem {
    fn from(value: UInt256) -> Self {
        StackItem::UInt256(value)
    }
}

impl From<ECPoint> for StackItem {
    fn from(value: ECPoint) -> Self {
        StackItem::ECPoint(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_bytes_are_minimal() {
        assert!(bigint_to_bytes(&BigInt::zero()).is_empty());
        assert_eq!(bigint_to_bytes(&BigInt::from(-1)), vec![0xff]);
        assert_eq!(bigint_to_bytes(&BigInt::from(128)), vec![0x80, 0x00]);
        assert_eq!(StackItem::from_int(255).as_buffer().unwrap(), vec![0xff, 0x00]);
    }

    #[test]
    fn test_boolean_conversions() {
        assert_eq!(StackItem::from(true).as_buffer().unwrap(), vec![1]);
        assert!(StackItem::from(false).as_buffer().unwrap().is_empty());
        assert!(!StackItem::from(vec![0u8, 0]).as_boolean());
        assert!(StackItem::from(vec![0u8, 1]).as_boolean());
        assert!(StackItem::new_array(Vec::new()).as_boolean());
    }

    #[test]
    fn test_buffer_to_integer() {
        assert_eq!(
            StackItem::from(vec![0xffu8]).as_big_integer().unwrap(),
            BigInt::from(-1)
        );
        assert_eq!(StackItem::empty().as_big_integer().unwrap(), BigInt::zero());
        assert!(matches!(
            StackItem::from(vec![1u8; 33]).as_big_integer(),
            Err(VmError::NumberTooLarge(_))
        ));
    }

    #[test]
    fn test_strict_conversions_fail() {
        let array = StackItem::new_array(Vec::new());
        assert!(matches!(
            array.as_buffer(),
            Err(VmError::Conversion { from: "Array", to: "Buffer" })
        ));
        assert!(StackItem::from(vec![1u8; 19]).as_uint160().is_err());
        assert!(StackItem::from(vec![1u8; 20]).as_uint160().is_ok());
        assert!(StackItem::from(vec![0xffu8]).as_string().is_err());
    }

    #[test]
    fn test_primitive_equality_compares_bytes() {
        assert_eq!(StackItem::from_int(1), StackItem::from(true));
        assert_eq!(StackItem::from_int(0), StackItem::empty());
        assert_ne!(StackItem::from_int(1), StackItem::from_int(2));
    }

    #[test]
    fn test_null_item() {
        let null = StackItem::Null;
        assert!(null.is_null());
        assert!(!null.as_boolean());
        assert_eq!(null, StackItem::Null);
        assert_ne!(null, StackItem::empty());
        assert!(!StackItem::empty().is_null());
        assert!(matches!(
            null.as_buffer(),
            Err(VmError::Conversion { from: "Null", to: "Buffer" })
        ));
        assert!(null.map_key().is_err());
    }

    #[test]
    fn test_array_equality_is_by_reference() {
        let a = StackItem::new_array(vec![StackItem::from_int(1)]);
        let b = StackItem::new_array(vec![StackItem::from_int(1)]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_struct_equality_and_copy() {
        let inner = StackItem::new_struct(vec![StackItem::from_int(1)]);
        let outer = StackItem::new_struct(vec![inner.clone()]);
        let copy = outer.copy_if_struct();
        assert_eq!(outer, copy);

        inner.as_array_ref().unwrap().borrow_mut().push(StackItem::from_int(2));
        assert_ne!(outer, copy);
    }
}
