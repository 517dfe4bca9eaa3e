use crate::error::{FfiError, guard};
use crate::status::coordgen_status_t;
use coordgen::{
    OwnedCoordinates, generate_coordinates, generate_coordinates_owned, release_coordinates,
    required_len,
};
use std::ptr;
use std::slice;

const BOND_TRIPLE_LEN: usize = 3;

fn addressable_len<T>(what: &'static str, count: usize) -> Result<usize, FfiError> {
    let max = isize::MAX as usize / std::mem::size_of::<T>().max(1);
    if count > max {
        Err(FfiError::CountOverflow { what, count })
    } else {
        Ok(count)
    }
}

fn triple_len<T>(n_bonds: usize) -> Result<usize, FfiError> {
    let len = n_bonds
        .checked_mul(BOND_TRIPLE_LEN)
        .ok_or(FfiError::CountOverflow {
            what: "bonds",
            count: n_bonds,
        })?;
    addressable_len::<T>("bonds", len)
}

/// # Safety
///
/// If `len` is non-zero and `ptr` is non-null, `ptr` must point to `len`
/// initialized values that stay alive and unmodified for `'a`.
unsafe fn input_slice<'a, T>(
    ptr: *const T,
    len: usize,
    what: &'static str,
) -> Result<&'a [T], FfiError> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(FfiError::NullPointer(what));
    }
    let len = addressable_len::<T>(what, len)?;
    Ok(unsafe { slice::from_raw_parts(ptr, len) })
}

/// # Safety
///
/// If `len` is non-zero and `ptr` is non-null, `ptr` must point to `len`
/// writable values not aliased elsewhere for `'a`.
unsafe fn output_slice<'a, T>(
    ptr: *mut T,
    len: usize,
    what: &'static str,
) -> Result<&'a mut [T], FfiError> {
    if len == 0 {
        return Ok(&mut []);
    }
    if ptr.is_null() {
        return Err(FfiError::NullPointer(what));
    }
    let len = addressable_len::<T>(what, len)?;
    Ok(unsafe { slice::from_raw_parts_mut(ptr, len) })
}

/// Lays out a molecule into a caller-allocated buffer.
///
/// `coords` must hold exactly `coordgen_required_length(n_atoms)` floats;
/// otherwise `COORDGEN_STATUS_LENGTH_MISMATCH` is returned. The buffer is
/// only written on success.
///
/// # Safety
///
/// `atoms` must point to `n_atoms` bytes, `bonds` to `3 * n_bonds` values and
/// `coords` to `coords_len` writable floats. A pointer may be null only when
/// its length is zero.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn coordgen_generate_coordinates(
    n_atoms: usize,
    atoms: *const u8,
    n_bonds: usize,
    bonds: *const u16,
    coords: *mut f32,
    coords_len: usize,
) -> coordgen_status_t {
    guard(|| {
        let atoms = unsafe { input_slice(atoms, n_atoms, "atoms") }?;
        let bonds = unsafe { input_slice(bonds, triple_len::<u16>(n_bonds)?, "bonds") }?;
        let coords = unsafe { output_slice(coords, coords_len, "coords") }?;
        generate_coordinates(n_atoms, atoms, n_bonds, bonds, coords)?;
        Ok(())
    })
}

/// Lays out a molecule into a buffer allocated by the library.
///
/// On success `*coords_out` receives the buffer and `*len_out` its length
/// (`2 * n_atoms`). The buffer must be passed back to
/// [`coordgen_release_coordinates`] exactly once. On failure `*coords_out` is
/// set to null and `*len_out` to zero.
///
/// # Safety
///
/// `atoms` must point to `n_atoms` values and `bonds` to `3 * n_bonds`
/// values, each may be null only when its count is zero. `coords_out` and
/// `len_out` must be valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn coordgen_generate_coordinates_owned(
    n_atoms: usize,
    atoms: *const i32,
    n_bonds: usize,
    bonds: *const i32,
    coords_out: *mut *mut f32,
    len_out: *mut usize,
) -> coordgen_status_t {
    guard(|| {
        if coords_out.is_null() {
            return Err(FfiError::NullPointer("coords_out"));
        }
        if len_out.is_null() {
            return Err(FfiError::NullPointer("len_out"));
        }
        unsafe {
            coords_out.write(ptr::null_mut());
            len_out.write(0);
        }

        let atoms = unsafe { input_slice(atoms, n_atoms, "atoms") }?;
        let bonds = unsafe { input_slice(bonds, triple_len::<i32>(n_bonds)?, "bonds") }?;
        let coordinates = generate_coordinates_owned(n_atoms, atoms, n_bonds, bonds)?;

        let (buffer, len) = coordinates.into_raw_parts();
        unsafe {
            coords_out.write(buffer);
            len_out.write(len);
        }
        Ok(())
    })
}

/// Frees a buffer returned by [`coordgen_generate_coordinates_owned`].
///
/// Passing null is a no-op.
///
/// # Safety
///
/// `coords` and `len` must be exactly the pair produced by one successful
/// call to `coordgen_generate_coordinates_owned`, and must not be used again
/// afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn coordgen_release_coordinates(coords: *mut f32, len: usize) {
    if coords.is_null() {
        return;
    }
    let coordinates = unsafe { OwnedCoordinates::from_raw_parts(coords, len) };
    release_coordinates(coordinates);
}

/// Number of floats needed to hold the coordinates of `n_atoms` atoms.
#[unsafe(no_mangle)]
pub extern "C" fn coordgen_required_length(n_atoms: usize) -> usize {
    required_len(n_atoms)
}
