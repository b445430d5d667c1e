// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

// These macros are adapted from Jörn Horstmann's thrift macros at
// https://github.com/jhorstmann/compact-thrift
// They allow for pasting sections of a thrift IDL file into a macro to
// generate rust structures and implementations.

/// Generate a rust enum plus codec impls from a thrift enum definition.
///
/// Enum values travel as `i32` on the wire; codes outside the definition
/// fail decoding.
#[macro_export]
macro_rules! thrift_enum {
    ($(#[$($def_attrs:tt)*])* enum $identifier:ident { $($(#[$($field_attrs:tt)*])* $field_name:ident = $field_value:literal;)* }) => {
        $(#[$($def_attrs)*])*
        #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        #[allow(non_camel_case_types)]
        #[allow(missing_docs)]
        pub enum $identifier {
            $($(#[$($field_attrs)*])* $field_name = $field_value,)*
        }

        impl $crate::bind::ReadCompact for $identifier {
            fn read_compact<S: $crate::protocol::ByteSource>(
                reader: &mut $crate::protocol::CompactReader<S>,
            ) -> $crate::errors::Result<Self> {
                let val = reader.read_i32()?;
                match val {
                    $($field_value => Ok(Self::$field_name),)*
                    _ => Err($crate::errors::ThriftError::InvalidData(
                        format!(concat!("unexpected ", stringify!($identifier), " value {}"), val),
                    )),
                }
            }
        }

        impl ::std::fmt::Display for $identifier {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{self:?}")
            }
        }

        impl $crate::bind::WriteCompact for $identifier {
            const TTYPE: $crate::protocol::TType = $crate::protocol::TType::I32;

            fn write_compact<W: ::std::io::Write>(
                &self,
                writer: &mut $crate::protocol::CompactWriter<W>,
            ) -> $crate::errors::Result<()> {
                writer.write_i32(*self as i32)
            }
        }
    }
}

/// Generate a rust struct plus codec impls from a thrift struct definition.
///
/// Decoding skips unknown field ids and known ids whose wire type does not
/// match the declaration, leaving such fields unset. After the stop marker,
/// required fields without a declared default must have been seen or
/// decoding fails with `RequiredFieldMissing`.
#[macro_export]
macro_rules! thrift_struct {
    ($(#[$($def_attrs:tt)*])* $vis:vis struct $identifier:ident { $($(#[$($field_attrs:tt)*])* $field_id:literal : $required_or_optional:ident $field_type:ident $(< $element_type:ident >)? $field_name:ident $(= $default_value:literal)? $(;)?)* }) => {
        $(#[$($def_attrs)*])*
        #[derive(Clone, Debug, Eq, PartialEq)]
        #[allow(non_camel_case_types)]
        #[allow(non_snake_case)]
        #[allow(missing_docs)]
        $vis struct $identifier {
            $($(#[$($field_attrs)*])* $vis $field_name: $crate::__thrift_required_or_optional!($required_or_optional $crate::__thrift_field_type!($field_type $($element_type)?))),*
        }

        impl $crate::bind::ReadCompact for $identifier {
            #[allow(non_snake_case)]
            fn read_compact<S: $crate::protocol::ByteSource>(
                reader: &mut $crate::protocol::CompactReader<S>,
            ) -> $crate::errors::Result<Self> {
                $(let mut $field_name: ::std::option::Option<$crate::__thrift_field_type!($field_type $($element_type)?)> = None;)*
                reader.read_struct_begin()?;
                loop {
                    let field = reader.read_field_begin()?;
                    if field.ttype == $crate::protocol::TType::Stop {
                        break;
                    }
                    match field.id {
                        $($field_id if field.ttype == $crate::__thrift_expected_ttype!($field_type $($element_type)?) => {
                            $field_name = Some($crate::__thrift_read_field!(reader, $field_type $($element_type)?));
                        })*
                        _ => {
                            reader.skip(field.ttype)?;
                        }
                    }
                    reader.read_field_end()?;
                }
                reader.read_struct_end()?;
                $($crate::__thrift_require_field!($required_or_optional $identifier, $field_name $(= $default_value)?);)*
                Ok(Self {
                    $($field_name),*
                })
            }
        }

        impl $crate::bind::WriteCompact for $identifier {
            const TTYPE: $crate::protocol::TType = $crate::protocol::TType::Struct;

            fn write_compact<W: ::std::io::Write>(
                &self,
                writer: &mut $crate::protocol::CompactWriter<W>,
            ) -> $crate::errors::Result<()> {
                writer.write_struct_begin()?;
                $($crate::__thrift_write_field!($required_or_optional self, $field_name, $field_id, writer);)*
                writer.write_field_stop()?;
                writer.write_struct_end()
            }
        }
    }
}

/// Generate a rust enum plus codec impls from a thrift union definition.
///
/// This requires modifying the thrift IDL. For variants with empty structs
/// as their type, delete the typename (i.e. "1: EmptyStruct Var1;" =>
/// "1: Var1"). For variants with a non-empty type, put the typename in
/// parens (e.g. "1: Type Var1;" => "1: (Type) Var1;").
///
/// Decoding is latest-wins: each recognized variant on the wire overwrites
/// the previous one, unknown ids are skipped, and a union that ends with no
/// variant set fails with `CantParseUnion`.
#[macro_export]
macro_rules! thrift_union {
    ($(#[$($def_attrs:tt)*])* union $identifier:ident { $($(#[$($field_attrs:tt)*])* $field_id:literal : $( ( $field_type:ident $(< $element_type:ident >)? ) )? $field_name:ident $(;)?)* }) => {
        $(#[$($def_attrs)*])*
        #[derive(Clone, Debug, Eq, PartialEq)]
        #[allow(non_camel_case_types)]
        #[allow(missing_docs)]
        pub enum $identifier {
            $($(#[$($field_attrs)*])* $field_name $( ( $crate::__thrift_field_type!($field_type $($element_type)?) ) )?),*
        }

        impl $crate::bind::ReadCompact for $identifier {
            fn read_compact<S: $crate::protocol::ByteSource>(
                reader: &mut $crate::protocol::CompactReader<S>,
            ) -> $crate::errors::Result<Self> {
                reader.read_struct_begin()?;
                let mut ret: ::std::option::Option<Self> = None;
                loop {
                    let field = reader.read_field_begin()?;
                    if field.ttype == $crate::protocol::TType::Stop {
                        break;
                    }
                    match field.id {
                        $($field_id if field.ttype == $crate::__thrift_union_expected!($($field_type $($element_type)?)?) => {
                            ret = Some($crate::__thrift_read_variant!(reader, $field_name $($field_type $($element_type)?)?));
                        })*
                        _ => {
                            reader.skip(field.ttype)?;
                        }
                    }
                    reader.read_field_end()?;
                }
                reader.read_struct_end()?;
                ret.ok_or_else(|| $crate::errors::ThriftError::CantParseUnion(
                    concat!("union ", stringify!($identifier), " has no set variant").to_owned(),
                ))
            }
        }

        impl $crate::bind::WriteCompact for $identifier {
            const TTYPE: $crate::protocol::TType = $crate::protocol::TType::Struct;

            fn write_compact<W: ::std::io::Write>(
                &self,
                writer: &mut $crate::protocol::CompactWriter<W>,
            ) -> $crate::errors::Result<()> {
                writer.write_struct_begin()?;
                match self {
                    $($crate::__thrift_write_variant_lhs!($field_name $($field_type)?, variant_val) =>
                        $crate::__thrift_write_variant_rhs!($field_id $($field_type)?, writer, variant_val),)*
                }
                writer.write_field_stop()?;
                writer.write_struct_end()
            }
        }
    }
}

/// Generate a rust enum plus codec impls for thrift unions whose variants
/// are all typed with empty structs. The payload typenames from the IDL are
/// accepted and ignored.
#[macro_export]
macro_rules! thrift_union_all_empty {
    ($(#[$($def_attrs:tt)*])* union $identifier:ident { $($(#[$($field_attrs:tt)*])* $field_id:literal : $field_type:ident $field_name:ident $(;)?)* }) => {
        $(#[$($def_attrs)*])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq)]
        #[allow(non_camel_case_types)]
        #[allow(missing_docs)]
        pub enum $identifier {
            $($(#[$($field_attrs)*])* $field_name),*
        }

        impl $crate::bind::ReadCompact for $identifier {
            fn read_compact<S: $crate::protocol::ByteSource>(
                reader: &mut $crate::protocol::CompactReader<S>,
            ) -> $crate::errors::Result<Self> {
                reader.read_struct_begin()?;
                let mut ret: ::std::option::Option<Self> = None;
                loop {
                    let field = reader.read_field_begin()?;
                    if field.ttype == $crate::protocol::TType::Stop {
                        break;
                    }
                    match field.id {
                        $($field_id if field.ttype == $crate::protocol::TType::Struct => {
                            ret = Some($crate::__thrift_read_variant!(reader, $field_name));
                        })*
                        _ => {
                            reader.skip(field.ttype)?;
                        }
                    }
                    reader.read_field_end()?;
                }
                reader.read_struct_end()?;
                ret.ok_or_else(|| $crate::errors::ThriftError::CantParseUnion(
                    concat!("union ", stringify!($identifier), " has no set variant").to_owned(),
                ))
            }
        }

        impl $crate::bind::WriteCompact for $identifier {
            const TTYPE: $crate::protocol::TType = $crate::protocol::TType::Struct;

            fn write_compact<W: ::std::io::Write>(
                &self,
                writer: &mut $crate::protocol::CompactWriter<W>,
            ) -> $crate::errors::Result<()> {
                writer.write_struct_begin()?;
                match *self {
                    $(Self::$field_name => {
                        writer.write_field_begin($crate::protocol::TType::Struct, $field_id)?;
                        writer.write_empty_struct()?;
                        writer.write_field_end()?;
                    })*
                }
                writer.write_field_stop()?;
                writer.write_struct_end()
            }
        }
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __thrift_required_or_optional {
    (required $field_type:ty) => { $field_type };
    (optional $field_type:ty) => { ::std::option::Option<$field_type> };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __thrift_field_type {
    (bool) => { bool };
    (byte) => { i8 };
    (i8) => { i8 };
    (i16) => { i16 };
    (i32) => { i32 };
    (i64) => { i64 };
    (double) => { $crate::bind::OrderedF64 };
    (string) => { ::std::string::String };
    (binary) => { $crate::bind::Bytes };
    (list $element_type:ident) => { ::std::vec::Vec<$crate::__thrift_field_type!($element_type)> };
    ($field_type:ident) => { $field_type };
}

// Logical type a declared field announces on the wire; used to skip fields
// whose wire type contradicts the declaration.
#[doc(hidden)]
#[macro_export]
macro_rules! __thrift_expected_ttype {
    (bool) => { $crate::protocol::TType::Bool };
    (byte) => { $crate::protocol::TType::Byte };
    (i8) => { $crate::protocol::TType::Byte };
    (i16) => { $crate::protocol::TType::I16 };
    (i32) => { $crate::protocol::TType::I32 };
    (i64) => { $crate::protocol::TType::I64 };
    (double) => { $crate::protocol::TType::Double };
    (string) => { $crate::protocol::TType::String };
    (binary) => { $crate::protocol::TType::String };
    (list $element_type:ident) => { $crate::protocol::TType::List };
    ($field_type:ident) => { <$field_type as $crate::bind::WriteCompact>::TTYPE };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __thrift_read_field {
    ($reader:tt, list $element_type:ident) => {
        <::std::vec::Vec<$crate::__thrift_field_type!($element_type)> as $crate::bind::ReadCompact>::read_compact(&mut *$reader)?
    };
    ($reader:tt, $field_type:ident) => {
        <$crate::__thrift_field_type!($field_type) as $crate::bind::ReadCompact>::read_compact(&mut *$reader)?
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __thrift_require_field {
    (required $identifier:ident, $field_name:ident = $default_value:literal) => {
        let $field_name = $field_name.unwrap_or_else(|| $default_value.into());
    };
    (required $identifier:ident, $field_name:ident) => {
        let $field_name = match $field_name {
            Some(val) => val,
            None => {
                return Err($crate::errors::ThriftError::RequiredFieldMissing(
                    concat!(stringify!($identifier), ".", stringify!($field_name)).to_owned(),
                ))
            }
        };
    };
    (optional $identifier:ident, $field_name:ident $(= $default_value:literal)?) => {};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __thrift_write_field {
    (required $self:ident, $field_name:ident, $field_id:literal, $writer:ident) => {
        $crate::bind::WriteCompactField::write_compact_field(&$self.$field_name, $writer, $field_id)?;
    };
    (optional $self:ident, $field_name:ident, $field_id:literal, $writer:ident) => {
        if let Some(val) = &$self.$field_name {
            $crate::bind::WriteCompactField::write_compact_field(val, $writer, $field_id)?;
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __thrift_union_expected {
    () => { $crate::protocol::TType::Struct };
    ($field_type:ident $($element_type:ident)?) => { $crate::__thrift_expected_ttype!($field_type $($element_type)?) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __thrift_read_variant {
    ($reader:tt, $field_name:ident $field_type:ident $($element_type:ident)?) => {
        Self::$field_name($crate::__thrift_read_field!($reader, $field_type $($element_type)?))
    };
    ($reader:tt, $field_name:ident) => {{
        // unit variants carry an empty struct payload; tolerate fields a
        // newer writer may have added
        $reader.read_struct_begin()?;
        loop {
            let field = $reader.read_field_begin()?;
            if field.ttype == $crate::protocol::TType::Stop {
                break;
            }
            $reader.skip(field.ttype)?;
            $reader.read_field_end()?;
        }
        $reader.read_struct_end()?;
        Self::$field_name
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __thrift_write_variant_lhs {
    ($field_name:ident $field_type:ident, $val:tt) => {
        Self::$field_name($val)
    };
    ($field_name:ident, $val:tt) => {
        Self::$field_name
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __thrift_write_variant_rhs {
    ($field_id:literal $field_type:ident, $writer:tt, $val:ident) => {
        $crate::bind::WriteCompactField::write_compact_field($val, $writer, $field_id)?
    };
    ($field_id:literal, $writer:tt, $val:tt) => {{
        $writer.write_field_begin($crate::protocol::TType::Struct, $field_id)?;
        $writer.write_empty_struct()?;
        $writer.write_field_end()?
    }};
}
