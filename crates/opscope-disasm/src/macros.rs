//! Declarative helpers for backend opcode and decoder tables.

/// Declares a `#[repr(u16)]` enum whose variants are dense ids starting at
/// zero, with `ALL`, `COUNT`, `from_id` and a `u16` conversion.
macro_rules! id_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),*
        }

        #[allow(dead_code)]
        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];
            pub const COUNT: usize = Self::ALL.len();

            pub fn from_id(id: u16) -> Option<Self> {
                Self::ALL.get(usize::from(id)).copied()
            }

            pub const fn id(self) -> u16 {
                self as u16
            }
        }

        impl From<$name> for u16 {
            fn from(value: $name) -> u16 {
                value as u16
            }
        }
    };
}

/// Declares an opcode enum (via [`id_enum!`]) and the matching static
/// [`OpcodeInfo`](crate::engine::OpcodeInfo) slice, one entry per variant:
///
/// ```ignore
/// opcode_table! {
///     pub enum Opcode in OPCODE_INFO {
///         Bl => "bl", Operation::Call, [READ] writes [LR] groups [CALL, JUMP];
///         BEq => "b.eq", Operation::ConditionalJump, [READ] reads [NZCV] cond Equal;
///     }
/// }
/// ```
macro_rules! opcode_table {
    (@regs) => { &[] };
    (@regs [$($reg:expr),*]) => { &[$($reg),*] };
    (@cond) => { None };
    (@cond $cond:ident) => { Some(::opscope_core::Condition::$cond) };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident in $info:ident {
            $(
                $variant:ident => $mnemonic:literal, $operation:expr, [$($access:ident),*]
                $(reads [$($read:expr),*])?
                $(writes [$($write:expr),*])?
                $(groups [$($group:ident),*])?
                $(cond $cond:ident)?
                ;
            )*
        }
    ) => {
        id_enum! {
            $(#[$meta])*
            $vis enum $name {
                $($variant),*
            }
        }

        $vis static $info: &[$crate::engine::OpcodeInfo] = &[
            $(
                $crate::engine::OpcodeInfo {
                    mnemonic: $mnemonic,
                    operation: $operation,
                    access: &[$(::opscope_core::Access::$access),*],
                    implicit_reads: opcode_table!(@regs $([$($read),*])?),
                    implicit_writes: opcode_table!(@regs $([$($write),*])?),
                    groups: ::opscope_core::Groups::empty()
                        $($(.union(::opscope_core::Groups::$group))*)?,
                    condition: opcode_table!(@cond $($cond)?),
                },
            )*
        ];
    };
}
