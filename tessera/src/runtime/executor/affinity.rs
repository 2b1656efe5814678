//! Pinning worker threads to CPUs.
//!
//! Linux uses `sched_setaffinity`, Windows `SetThreadAffinityMask`.
//! Other targets report [`io::ErrorKind::Unsupported`].

use std::io;

/// Pins the calling thread to logical CPU `cpu`.
#[cfg(target_os = "linux")]
pub(crate) fn bind_current_thread(cpu: usize) -> io::Result<()> {
    use std::mem;

    if cpu >= libc::CPU_SETSIZE as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cpu {cpu} is outside the affinity mask"),
        ));
    }

    let result = unsafe {
        let mut set: libc::cpu_set_t = mem::zeroed();
        libc::CPU_SET(cpu, &mut set);

        libc::sched_setaffinity(0, mem::size_of::<libc::cpu_set_t>(), &set)
    };

    if result != 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

/// Pins the calling thread to logical CPU `cpu`.
#[cfg(windows)]
pub(crate) fn bind_current_thread(cpu: usize) -> io::Result<()> {
    use windows_sys::Win32::System::Threading::{GetCurrentThread, SetThreadAffinityMask};

    if cpu >= usize::BITS as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cpu {cpu} is outside the affinity mask"),
        ));
    }

    // The previous mask is returned on success, zero on failure.
    let previous = unsafe { SetThreadAffinityMask(GetCurrentThread(), 1usize << cpu) };

    if previous == 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

/// Pins the calling thread to logical CPU `cpu`.
#[cfg(not(any(target_os = "linux", windows)))]
pub(crate) fn bind_current_thread(cpu: usize) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("cannot bind to cpu {cpu}: thread affinity is not supported on this platform"),
    ))
}
